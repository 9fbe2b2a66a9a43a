//! # Ticketera CLI
//!
//! Command-line interface for the ESC/POS print gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP gateway
//! ticketera serve --listen 0.0.0.0:8080
//!
//! # Send a raw command file (bitmap markers are spliced first)
//! ticketera send --ip 192.168.1.50 job.bin
//!
//! # Check that a printer accepts connections
//! ticketera probe --ip 192.168.1.50
//!
//! # Convert a logo to a GS v 0 raster command
//! ticketera raster logo.png -o logo.bin
//! ```
//!
//! Set `RUST_LOG=debug` for more detail.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use ticketera::{
    GatewayError, PrintJob, TcpTransport,
    png,
    protocol::{commands, graphics},
    raster,
    server::{self, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_BODY_BYTES, ServerConfig},
    splice,
    transport::DEFAULT_PRINTER_PORT,
};

/// Ticketera - ESC/POS print gateway
#[derive(Parser, Debug)]
#[command(name = "ticketera")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP print gateway
    Serve {
        /// Address to listen on
        #[arg(long, env = "TICKETERA_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Printer port used when a request does not name one
        #[arg(long, env = "TICKETERA_PRINTER_PORT", default_value_t = DEFAULT_PRINTER_PORT)]
        printer_port: u16,

        /// Connect + write timeout for print jobs, in milliseconds
        #[arg(long, env = "TICKETERA_PRINT_TIMEOUT_MS", default_value_t = 5000)]
        print_timeout_ms: u64,

        /// Connect timeout for reachability tests, in milliseconds
        #[arg(long, env = "TICKETERA_PROBE_TIMEOUT_MS", default_value_t = 3000)]
        probe_timeout_ms: u64,

        /// Maximum request body size in bytes
        #[arg(long, env = "TICKETERA_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
        max_body_bytes: usize,
    },

    /// Splice bitmap markers in a command file and send it to a printer
    Send {
        /// Raw ESC/POS command file
        file: PathBuf,

        /// Printer IP address or hostname
        #[arg(long)]
        ip: String,

        /// Printer port
        #[arg(long, default_value_t = DEFAULT_PRINTER_PORT)]
        port: u16,

        /// Connect + write timeout in milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
    },

    /// Check whether a printer accepts TCP connections
    Probe {
        /// Printer IP address or hostname
        #[arg(long)]
        ip: String,

        /// Printer port
        #[arg(long, default_value_t = DEFAULT_PRINTER_PORT)]
        port: u16,

        /// Connect timeout in milliseconds
        #[arg(long, default_value_t = 3000)]
        timeout_ms: u64,
    },

    /// Convert a PNG into an ESC/POS raster command
    Raster {
        /// Input PNG file
        png: PathBuf,

        /// Write the command bytes here (omit to only print a summary)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Wrap the image in init / feed / cut so the file prints on its own
        #[arg(long)]
        job: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GatewayError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            printer_port,
            print_timeout_ms,
            probe_timeout_ms,
            max_body_bytes,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                default_printer_port: printer_port,
                print_timeout: Duration::from_millis(print_timeout_ms),
                probe_timeout: Duration::from_millis(probe_timeout_ms),
                max_body_bytes,
                ..Default::default()
            };
            runtime()?.block_on(server::serve(config))
        }

        Commands::Send {
            file,
            ip,
            port,
            timeout_ms,
        } => {
            let buffer = std::fs::read(&file)?;
            let (payload, stats) = splice::splice_markers_with_stats(&buffer);
            println!(
                "{}: {} bytes, {} bitmap(s) replaced, {} stripped",
                file.display(),
                payload.len(),
                stats.replaced,
                stats.stripped
            );

            let job = PrintJob::new(ip, Some(port), payload);
            runtime()?.block_on(job.dispatch(Duration::from_millis(timeout_ms)))?;
            println!("Sent to {}", job);
            Ok(())
        }

        Commands::Probe {
            ip,
            port,
            timeout_ms,
        } => {
            let transport =
                TcpTransport::new(ip, port).with_timeout(Duration::from_millis(timeout_ms));
            let latency = runtime()?.block_on(transport.probe())?;
            println!("{} reachable in {} ms", transport.addr(), latency.as_millis());
            Ok(())
        }

        Commands::Raster { png: path, output, job } => {
            let image = png::decode(&std::fs::read(&path)?)?;
            let bitmap = raster::to_monochrome(&image);
            let command = graphics::raster(&bitmap)?;

            let ink = bitmap.raster.iter().map(|b| b.count_ones()).sum::<u32>();
            println!(
                "{}: {}x{} {:?}, {} bytes per row, {} ink dots",
                path.display(),
                image.width,
                image.height,
                image.color_type,
                bitmap.bytes_per_row,
                ink
            );

            if let Some(out) = output {
                let mut data = Vec::with_capacity(command.len() + 16);
                if job {
                    data.extend(commands::init());
                }
                data.extend(command);
                if job {
                    data.extend(commands::feed_lines(3));
                    data.extend(commands::cut_full_feed(0));
                }
                std::fs::write(&out, &data)?;
                println!("Wrote {} bytes to {}", data.len(), out.display());
            }
            Ok(())
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, GatewayError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
