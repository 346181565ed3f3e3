/** ------------------------------------------------------------
 * Capture file persistence (classic pcap, Ethernet link type)
 * ------------------------------------------------------------- */
use crate::errors::Result;
use crate::flow::FlowMac;
use crate::frame::{frame_source, SyntheticFrame};
use pcap_file::pcap::{PcapHeader, PcapPacket, PcapReader, PcapWriter};
use pcap_file::DataLink;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/**
 * Frame as read back from a capture
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub timestamp: std::time::Duration,
    pub src: FlowMac,
    pub len: usize,
}

/**
 * Write frames to `writer` in timestamp order
 *
 * Frames are sorted (stable) before writing, so callers may pass them
 * in any order. Returns the number of frames written.
 */
pub fn write_capture<W: Write>(writer: W, frames: &[SyntheticFrame]) -> Result<usize> {
    let header = PcapHeader {
        datalink: DataLink::ETHERNET,
        ..Default::default()
    };
    let mut pcap_writer = PcapWriter::with_header(writer, header)?;

    let mut ordered: Vec<&SyntheticFrame> = frames.iter().collect();
    ordered.sort_by_key(|frame| frame.timestamp);

    for frame in &ordered {
        let data = frame.to_bytes();
        let packet = PcapPacket::new(frame.timestamp, data.len() as u32, &data);
        pcap_writer.write_packet(&packet)?;
    }

    pcap_writer.into_writer().flush()?;
    Ok(ordered.len())
}

/**
 * Read every frame of a capture
 */
pub fn read_capture<R: Read>(reader: R) -> Result<Vec<CapturedFrame>> {
    let mut pcap_reader = PcapReader::new(reader)?;
    let mut frames = Vec::new();

    while let Some(packet) = pcap_reader.next_packet() {
        let packet = packet?;
        frames.push(CapturedFrame {
            timestamp: packet.timestamp,
            src: frame_source(&packet.data)?,
            len: packet.data.len(),
        });
    }

    Ok(frames)
}

pub fn write_capture_file(path: &Path, frames: &[SyntheticFrame]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let written = write_capture(BufWriter::new(File::create(path)?), frames)?;
    info!(path = %path.display(), frames = written, "capture written");
    Ok(written)
}

pub fn read_capture_file(path: &Path) -> Result<Vec<CapturedFrame>> {
    read_capture(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_LEN;
    use crate::scenario::Scenario;
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn capture_preserves_sources_and_order() {
        let frames = Scenario::three_flows().frames();

        let mut buffer = Vec::new();
        let written = write_capture(&mut buffer, &frames).unwrap();
        assert_eq!(written, 10);

        let read_back = read_capture(Cursor::new(buffer)).unwrap();
        let sources: Vec<FlowMac> = read_back.iter().map(|f| f.src).collect();
        let expected: Vec<FlowMac> = frames.iter().map(|f| f.src).collect();
        assert_eq!(sources, expected);

        assert!(read_back.iter().all(|f| f.len == FRAME_LEN));
        assert_eq!(read_back[3].timestamp, Duration::from_millis(300));
    }

    #[test]
    fn frames_are_written_in_timestamp_order() {
        let frames = [
            SyntheticFrame::new(Duration::from_millis(200), FlowMac::C),
            SyntheticFrame::new(Duration::from_millis(0), FlowMac::A),
            SyntheticFrame::new(Duration::from_millis(100), FlowMac::B),
        ];

        let mut buffer = Vec::new();
        write_capture(&mut buffer, &frames).unwrap();

        let sources: Vec<FlowMac> = read_capture(Cursor::new(buffer))
            .unwrap()
            .into_iter()
            .map(|f| f.src)
            .collect();
        assert_eq!(sources, [FlowMac::A, FlowMac::B, FlowMac::C]);
    }

    #[test]
    fn empty_capture() {
        let mut buffer = Vec::new();
        assert_eq!(write_capture(&mut buffer, &[]).unwrap(), 0);
        assert!(read_capture(Cursor::new(buffer)).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(read_capture(Cursor::new(vec![0u8; 10])).is_err());
    }
}
