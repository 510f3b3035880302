//! kvfacade - command-line front end
//!
//! Connects to a store, sends one raw command through the façade and prints
//! the classified reply.

use kvfacade::{ClientConfig, Command, CommandOutcome, KvFacade, TcpConnection};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Parsed command line
struct Cli {
    config: ClientConfig,
    /// Command name followed by its arguments
    words: Vec<String>,
}

impl Cli {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = ClientConfig::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    config.host = value_of(&args, i, "--host").to_string();
                    i += 2;
                }
                "--port" | "-p" => {
                    config.port = value_of(&args, i, "--port").parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                }
                "--db" | "-n" => {
                    config.database = value_of(&args, i, "--db").parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid database number");
                        std::process::exit(1);
                    });
                    i += 2;
                }
                "--password" | "-a" => {
                    config.password = Some(value_of(&args, i, "--password").to_string());
                    i += 2;
                }
                "--timeout" | "-t" => {
                    let millis: u64 =
                        value_of(&args, i, "--timeout").parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid timeout (milliseconds)");
                            std::process::exit(1);
                        });
                    config.response_timeout = Duration::from_millis(millis);
                    i += 2;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("kvfacade version {}", kvfacade::VERSION);
                    std::process::exit(0);
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    eprintln!("Unknown argument: {}", flag);
                    print_help();
                    std::process::exit(1);
                }
                _ => break,
            }
        }

        Cli {
            config,
            words: args[i..].to_vec(),
        }
    }
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires a value", flag);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"
kvfacade - Typed command façade for RESP key-value stores

USAGE:
    kvfacade [OPTIONS] <COMMAND> [ARGS...]

OPTIONS:
    -h, --host <HOST>          Store host (default: 127.0.0.1)
    -p, --port <PORT>          Store port (default: 6379)
    -n, --db <N>               Database to SELECT after connecting (default: 0)
    -a, --password <PASSWORD>  Password to AUTH with
    -t, --timeout <MS>         Response timeout in milliseconds (default: 5000)
    -v, --version              Print version information
        --help                 Print this help message

EXAMPLES:
    kvfacade PING
    kvfacade SET name Ariz
    kvfacade -n 2 HGETALL user:101

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=kvfacade=trace) to see each round trip.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::from_args();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some((name, args)) = cli.words.split_first() else {
        print_help();
        return Ok(ExitCode::FAILURE);
    };

    let conn = TcpConnection::connect(&cli.config).await?;
    let mut kv = KvFacade::new(conn);

    let command = Command::new(name.to_ascii_uppercase()).args(args);
    let code = match kv.command(command).await {
        CommandOutcome::Success(reply) => {
            println!("{}", reply);
            ExitCode::SUCCESS
        }
        CommandOutcome::KeyMissing => {
            println!("(nil)");
            ExitCode::SUCCESS
        }
        CommandOutcome::WrongType => {
            println!("(error) WRONGTYPE Operation against a key holding the wrong kind of value");
            ExitCode::FAILURE
        }
        CommandOutcome::StoreError(message) => {
            println!("(error) {}", message);
            ExitCode::FAILURE
        }
        CommandOutcome::TransportFailure(e) => return Err(e.into()),
    };

    Ok(code)
}
