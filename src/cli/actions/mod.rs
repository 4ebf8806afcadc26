pub mod server;

use secrecy::SecretString;

/// What the parsed command line asks the binary to do.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        jwt_secret: SecretString,
    },
}
