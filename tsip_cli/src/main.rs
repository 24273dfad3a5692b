use std::{
    io::{self, Read, Write},
    sync::mpsc::{channel, Sender},
    thread,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use tsip::{Deframer, DecoderConfig, Lassen, ReceiverState};

mod cli;

/// All-in-view satellite selection, the last report of every fix cycle
const SOLUTION_STATUS_ID: u8 = 0x6d;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_env("TSIP_LOG")
        .init();

    let source = args.open_source()?;
    let config = args.decoder_config();
    let every_frame = args.every_frame;

    let (snapshot_tx, snapshot_rx) = channel();
    let decoder = thread::spawn(move || decode_stream(source, config, every_frame, snapshot_tx));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for snapshot in snapshot_rx {
        if args.pretty {
            serde_json::to_writer_pretty(&mut out, &snapshot)?;
        } else {
            serde_json::to_writer(&mut out, &snapshot)?;
        }
        writeln!(out)?;
    }

    decoder
        .join()
        .map_err(|_| anyhow!("decoder thread panicked"))?
}

/// Decodes `source` until it ends, publishing owned snapshots of the receiver
/// state. Stops early once the printer hangs up.
fn decode_stream(
    mut source: Box<dyn Read + Send>,
    config: DecoderConfig,
    every_frame: bool,
    snapshots: Sender<ReceiverState>,
) -> Result<()> {
    let mut lassen = Lassen::with_config(config);
    let mut deframer = Deframer::new();
    let mut buffer = [0u8; 1024];
    let mut frames = 0usize;

    loop {
        let len = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(len) => len,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => {
                continue
            },
            Err(e) => return Err(e).context("reading TSIP input"),
        };

        for frame in deframer.consume(&buffer[..len]) {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("framing: {e}");
                    continue;
                },
            };
            let decoded = match lassen.decode_frame(frame.as_bytes()) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("{e}");
                    continue;
                },
            };
            frames += 1;
            debug!("0x{:02x} {}", decoded.id, decoded.label);
            if decoded.underflow {
                warn!(
                    "0x{:02x} {}: {} payload bytes, expected {}",
                    decoded.id, decoded.label, decoded.payload_len, decoded.expected
                );
            }
            if let Some(e) = decoded.cursor_error.filter(|_| !decoded.underflow) {
                warn!("0x{:02x} {}: {e}", decoded.id, decoded.label);
            }
            if let Some(oob) = lassen.take_out_of_bounds() {
                warn!("{oob}");
            }
            if (every_frame || decoded.id == SOLUTION_STATUS_ID)
                && snapshots.send(lassen.snapshot()).is_err()
            {
                return Ok(());
            }
        }
    }

    info!(
        "{frames} frames decoded, {} bytes outside frames",
        deframer.discarded()
    );
    Ok(())
}
