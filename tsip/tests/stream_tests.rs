use byteorder::{BigEndian, WriteBytesExt};
use tsip::{
    constants::MAX_FRAME_LEN, framing::stuff, Deframer, Frame, FramingError, Lassen, PrnKeyed,
};

/// Receiver output of one fix cycle: health, signal levels (PRN 16 is a DLE
/// and gets stuffed), solution status and a tracking report.
fn capture() -> Vec<u8> {
    let mut wire = vec![0x00, 0x03, 0xff];
    wire.extend(stuff(0x46, &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]));

    let mut levels = vec![3];
    for (prn, level) in [(16u8, 41.0f32), (4, 36.5), (29, 44.25)] {
        levels.write_u8(prn).unwrap();
        levels.write_f32::<BigEndian>(level).unwrap();
    }
    wire.extend(stuff(0x47, &levels));

    let mut solution = vec![0x34];
    for dop in [2.0f32, 1.5, 1.0, 0.5] {
        solution.write_f32::<BigEndian>(dop).unwrap();
    }
    solution.extend([16, 4, 29]);
    wire.extend(stuff(0x6d, &solution));

    let mut tracking = vec![16, 0x00, 1, 1];
    for v in [41.0f32, 3_600.0, 0.9, 0.3] {
        tracking.write_f32::<BigEndian>(v).unwrap();
    }
    tracking.extend([0, 0, 0, 0]);
    wire.extend(stuff(0x5c, &tracking));
    wire
}

fn run(lassen: &mut Lassen, deframer: &mut Deframer, data: &[u8]) -> Vec<u8> {
    let mut ids = vec![];
    for frame in deframer.consume(data) {
        let frame = frame.unwrap();
        let decoded = lassen.decode_frame(frame.as_bytes()).unwrap();
        assert!(!decoded.underflow, "{decoded:?}");
        assert_eq!(decoded.leftover, 0, "{decoded:?}");
        ids.push(decoded.id);
    }
    ids
}

#[test]
fn test_stream_in_one_go() {
    let mut lassen = Lassen::new();
    let mut deframer = Deframer::new();
    assert_eq!(
        run(&mut lassen, &mut deframer, &capture()),
        [0x46, 0x47, 0x6d, 0x5c]
    );
    assert!(deframer.is_buffer_empty());

    let state = lassen.state();
    assert!(state.health().is_doing_fixes());
    assert_eq!(state.signal_levels().level_of(16), Some(41.0));
    assert_eq!(state.solution().prns(), &[16, 4, 29]);
    let tracked: Vec<u8> = state.tracking().iter().map(|s| s.prn()).collect();
    assert_eq!(tracked, [16]);
}

#[test]
fn test_stream_byte_by_byte() {
    let mut lassen = Lassen::new();
    let mut deframer = Deframer::new();
    let mut ids = vec![];
    for byte in capture() {
        ids.extend(run(&mut lassen, &mut deframer, &[byte]));
    }
    assert_eq!(ids, [0x46, 0x47, 0x6d, 0x5c]);
    assert_eq!(lassen.state().signal_levels().len(), 3);
}

#[test]
fn test_stuffing_collapses_doubled_dle() {
    let payload = [0x10, 0x10, 0x01, 0x10];
    let wire = stuff(0x13, &payload);
    assert_eq!(
        wire,
        [0x10, 0x13, 0x10, 0x10, 0x10, 0x10, 0x01, 0x10, 0x10, 0x10, 0x03]
    );

    let mut deframer = Deframer::new();
    let frames: Vec<_> = deframer.consume(&wire).collect();
    assert_eq!(frames, [Ok(Frame::new(0x13, &payload))]);
}

#[test]
fn test_bad_escape_reported() {
    let mut deframer = Deframer::new();
    let frames: Vec<_> = deframer
        .consume(&[0x10, 0x4e, 0x10, 0x59, 0x10, 0x03])
        .collect();
    assert_eq!(frames[0], Err(FramingError::UnexpectedByteAfterDle(0x59)));
}

#[test]
fn test_truncated_frame_is_held_back() {
    let wire = stuff(0x4d, &1.0f32.to_be_bytes());
    let mut deframer = Deframer::new();
    assert_eq!(deframer.consume(&wire[..wire.len() - 1]).count(), 0);
    assert!(!deframer.is_buffer_empty());
    let frames: Vec<_> = deframer.consume(&wire[wire.len() - 1..]).collect();
    assert_eq!(frames.len(), 1);
    assert!(deframer.is_buffer_empty());
}

#[test]
fn test_longest_deframed_frame_fits_the_decoder() {
    // id + payload + DLE ETX, one byte short of the cursor capacity
    let longest = MAX_FRAME_LEN - 1 - 3;
    let mut deframer = Deframer::new();
    let mut lassen = Lassen::new();

    let frames: Vec<_> = deframer.consume(&stuff(0x13, &vec![1; longest])).collect();
    assert_eq!(frames.len(), 1);
    let frame = frames[0].as_ref().unwrap();
    assert_eq!(frame.as_bytes().len(), MAX_FRAME_LEN - 1);
    let decoded = lassen.decode_frame(frame.as_bytes()).unwrap();
    assert_eq!(decoded.id, 0x13);
    assert_eq!(decoded.payload_len, longest);

    let frames: Vec<_> = deframer
        .consume(&stuff(0x13, &vec![1; longest + 1]))
        .collect();
    assert_eq!(
        frames,
        [Err(FramingError::FrameTooLong {
            max: MAX_FRAME_LEN - 1
        })]
    );
    assert!(deframer.is_buffer_empty());
}
