//! Blinkmorse CLI
//!
//! Usage:
//!   blinkmorse --trace frames.txt              # Replay a recorded frame trace
//!   tracker | blinkmorse --stdin               # Decode frames piped from an eye tracker
//!   blinkmorse --encode "sos"                  # Show Morse for text
//!   blinkmorse --encode "sos" --emit-trace     # Synthesize a frame trace for text
//!   blinkmorse --serve                         # HTTP API server
//!   blinkmorse --trace frames.txt --json       # JSON output

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use blinkmorse::core::{Frame, FrameStream, FrameTrace, MorseDecoder, MorseTable, run_server};
use blinkmorse::types::{DecodeEvent, DecoderConfig, DecoderOutput};
use blinkmorse::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "blinkmorse",
    version = VERSION,
    about = "Decode eye-blink closures into text using Morse timing",
    long_about = "Blinkmorse turns a stream of (timestamp, eye closed) frames into text.\n\n\
                  Closures:\n  \
                  short   (<= dot_max)     dot\n  \
                  medium  (<= dash_max)    dash\n  \
                  long    (<= delete_max)  delete last character\n  \
                  longer                   ignored\n\n\
                  Silence after the last symbol ends a letter (letter_gap);\n\
                  further silence ends a word (word_gap).\n\n\
                  Frame format, one per line: <t_ms> <1|0|closed|open>"
)]
struct Args {
    /// Replay a frame trace file
    #[arg(short, long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Read frames from stdin as they arrive
    #[arg(long)]
    stdin: bool,

    /// Print the Morse form of TEXT
    #[arg(short, long, value_name = "TEXT")]
    encode: Option<String>,

    /// With --encode, print a frame trace that decodes to TEXT instead
    #[arg(long, requires = "encode")]
    emit_trace: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Decoder config JSON (fields in milliseconds)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Longest dot closure (ms)
    #[arg(long)]
    dot_max_ms: Option<u64>,

    /// Longest dash closure (ms)
    #[arg(long)]
    dash_max_ms: Option<u64>,

    /// Longest delete closure (ms)
    #[arg(long)]
    delete_max_ms: Option<u64>,

    /// Silence that ends a letter (ms)
    #[arg(long)]
    letter_gap_ms: Option<u64>,

    /// Silence that ends a word (ms)
    #[arg(long)]
    word_gap_ms: Option<u64>,

    /// How long delete feedback stays visible (ms)
    #[arg(long)]
    feedback_ms: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show every decoder event
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    if args.serve {
        run_serve(&args, config).await;
    } else if let Some(ref text) = args.encode {
        run_encode(text, &args, &config);
    } else if let Some(ref path) = args.trace {
        run_trace(path, &args, config);
    } else {
        if !args.stdin {
            tracing::debug!("no mode given, reading frames from stdin");
        }
        run_stdin(&args, config);
    }
}

/// Install the tracing subscriber; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let default = if verbose { "blinkmorse=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then config file, then per-flag overrides
fn build_config(args: &Args) -> Result<DecoderConfig, blinkmorse::types::ConfigError> {
    let mut config = match args.config {
        Some(ref path) => DecoderConfig::from_json_file(path)?,
        None => DecoderConfig::default(),
    };

    let overrides = [
        (args.dot_max_ms, &mut config.dot_max_ms),
        (args.dash_max_ms, &mut config.dash_max_ms),
        (args.delete_max_ms, &mut config.delete_max_ms),
        (args.letter_gap_ms, &mut config.letter_gap_ms),
        (args.word_gap_ms, &mut config.word_gap_ms),
        (args.feedback_ms, &mut config.delete_feedback_ms),
    ];
    for (value, slot) in overrides {
        if let Some(v) = value {
            *slot = v;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Replay a trace file
fn run_trace(path: &Path, args: &Args, config: DecoderConfig) {
    let trace = match FrameTrace::from_file(path) {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("Trace error: {}", e);
            std::process::exit(1);
        }
    };

    let mut decoder = MorseDecoder::new(config);
    for frame in trace.frames() {
        feed_frame(&mut decoder, frame, args);
    }

    print_summary(&decoder, args);
}

/// Decode frames from stdin until EOF
fn run_stdin(args: &Args, config: DecoderConfig) {
    let mut decoder = MorseDecoder::new(config);

    if !args.json {
        print_header("Stream Mode", args.no_color);
        println!("Reading frames from stdin: <t_ms> <1|0>. Ctrl-D to finish.");
        println!();
    }

    // Bad lines are skipped inside the stream; a read failure ends the session
    for frame in FrameStream::new(io::stdin().lock()) {
        match frame {
            Ok(frame) => feed_frame(&mut decoder, &frame, args),
            Err(e) => {
                print_summary(&decoder, args);
                eprintln!("Read error: {}", e);
                std::process::exit(1);
            }
        }
    }

    print_summary(&decoder, args);
}

/// Process one frame and print if anything happened
fn feed_frame(decoder: &mut MorseDecoder, frame: &Frame, args: &Args) {
    let now = frame.timestamp();
    let events = decoder.process_frame(now, frame.closed);
    if events.is_empty() {
        return;
    }

    let output = decoder.output(now, &events);
    if args.verbose && !args.json {
        for event in &events {
            print_event(event, frame.t_ms, args.no_color);
        }
    }
    if args.verbose || events.iter().any(DecodeEvent::changes_text) {
        print_output(&output, args);
    }
    let _ = io::stdout().flush();
}

/// Print the Morse form, or a synthesized trace
fn run_encode(text: &str, args: &Args, config: &DecoderConfig) {
    if args.emit_trace {
        match FrameTrace::synthesize(text, config) {
            Ok(trace) => print!("{}", trace.render()),
            Err(e) => {
                eprintln!("Encode error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match MorseTable::global().encode_text(text) {
        Ok(morse) => {
            if args.json {
                #[derive(serde::Serialize)]
                struct Encoded<'a> {
                    text: String,
                    morse: &'a str,
                }
                let encoded = Encoded { text: FrameTrace::normalize(text), morse: &morse };
                println!("{}", serde_json::to_string(&encoded).unwrap_or_default());
            } else {
                println!("{}", morse);
            }
        }
        Err(e) => {
            eprintln!("Encode error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  Blinkmorse v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m╔══════════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║   Blinkmorse v{} - {}              ║\x1b[0m", VERSION, mode);
        println!("\x1b[1m╚══════════════════════════════════════════╝\x1b[0m");
    }
    println!();
}

/// Print one decoder snapshot
fn print_output(output: &DecoderOutput, args: &Args) {
    if args.json {
        println!("{}", serde_json::to_string(output).unwrap_or_default());
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }
}

/// Print one event line (verbose)
fn print_event(event: &DecodeEvent, t_ms: u64, no_color: bool) {
    let (color, reset) = if no_color { ("", "") } else { ("\x1b[90m", "\x1b[0m") };
    println!("{}  [{:>7}ms] {}{}", color, t_ms, event, reset);
}

/// Print the final message
fn print_summary(decoder: &MorseDecoder, args: &Args) {
    if args.json {
        print_output(&decoder.current_output(), args);
        return;
    }

    println!();
    println!("Frames: {}", decoder.frame_count());
    if !decoder.pending_symbols().is_empty() {
        println!(
            "Unfinished letter: {}",
            blinkmorse::types::Symbol::sequence_to_string(decoder.pending_symbols())
        );
    }
    println!("Message: {}", decoder.decoded_text());
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: DecoderConfig) {
    println!();
    println!("╔══════════════════════════════════════════╗");
    println!("║  Blinkmorse API Server v{}            ║", VERSION);
    println!("╚══════════════════════════════════════════╝");
    println!("  POST   /session/new        - Create session");
    println!("  GET    /session/:id        - Get decoder state");
    println!("  POST   /session/:id/frame  - Feed a frame");
    println!("  DELETE /session/:id        - End session");
    println!("  WS     /ws/:id             - Live updates");
    println!("  GET    /health             - Health check");
    println!();

    if let Err(e) = run_server(&args.addr, config).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
