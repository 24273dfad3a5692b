//! # tsip
//!
//! A pure-rust decoder for the Trimble Standard Interface Protocol (TSIP) as
//! spoken by Lassen-class GPS receivers.
//!
//! An example of using this library on a capture file or serial device can be
//! seen in the tsip_cli subfolder of this project.
//!
//! Framing
//! =======
//!
//! On the wire every message is `DLE <id> <payload> DLE ETX`, with each DLE of
//! the id or payload doubled. The [`Deframer`] removes the stuffing and yields
//! one [`Frame`] per message:
//! ```
//! use tsip::{framing::stuff, Deframer};
//!
//! let wire = stuff(0x4e, b"Y");
//! let mut deframer = Deframer::new();
//! for frame in deframer.consume(&wire) {
//!     let frame = frame.unwrap();
//!     assert_eq!(frame.id(), 0x4e);
//!     assert_eq!(frame.payload(), b"Y");
//! }
//! ```
//!
//! Decoding
//! ========
//!
//! De-stuffed frames are handed to a [`Lassen`] decoder, which looks the
//! message id up in its [`Registry`] and updates the matching entity of its
//! [`ReceiverState`]:
//! ```
//! use tsip::{Deframer, Lassen};
//!
//! let mut lassen = Lassen::new();
//! let mut deframer = Deframer::new();
//! let my_raw_data = vec![0x10, 0x4e, b'Y', 0x10, 0x03]; // From your serial port
//! for frame in deframer.consume(&my_raw_data) {
//!     match frame {
//!         Ok(frame) => {
//!             if let Err(e) = lassen.decode_frame(frame.as_bytes()) {
//!                 // Unknown or truncated message, the state is untouched
//!                 eprintln!("{e}");
//!             }
//!         },
//!         Err(_) => {
//!             // Malformed stuffing
//!         },
//!     }
//! }
//! assert!(lassen.state().set_time_response().accepted());
//! ```
//!
//! Short payloads are not errors: missing fields read as zero and the
//! returned [`Decoded`] has `underflow` set.

pub use crate::{
    config::{DecoderConfig, HealthLayout},
    cursor::ByteCursor,
    dispatch::{DecodeContext, DecodeFn, Decoded, Entry, Registry},
    error::{CursorError, DecodeError, FieldOutOfBounds, FramingError, TableError},
    framing::{Deframer, Frame},
    lassen::Lassen,
    packets::*,
    state::ReceiverState,
    tracking::{BoundedTable, Inserted, OverflowPolicy, PrnKeyed},
};

pub mod constants;
pub mod framing;

mod config;
mod cursor;
mod dispatch;
mod error;
mod lassen;
mod packets;
mod state;
mod tracking;
