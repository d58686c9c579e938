//! Huffman bit-tree string decoding for compressed talk tables.
//!
//! The compressed talk table revisions do not store text per entry. All
//! strings share two blobs: a serialized Huffman tree and a packed bitstream,
//! and every entry only records the absolute bit offset its text starts at.
//!
//! The tree is a flat array of signed 32 bit values, two consecutive values
//! per node (one per child). A value of zero or more names the next node, a
//! negative value is a leaf holding a bias coded UTF-16 code unit: leaf `v`
//! decodes to the code unit `0xFFFF - v` truncated to 16 bits, so `-1` is the
//! string terminator 0 and `-66` is `'A'`. The root is the last node.
//!
//! The bitstream is a sequence of 32 bit words. Bit `i` lives in word
//! `i >> 5` at position `i & 31`, counted from the least significant bit.
//! Both blobs follow the byte order of the container they were read from.

use aurora_gff4::ByteOrder;
use widestring::U16String;

use crate::error::HuffmanError;

/// A Huffman tree parsed from its serialized blob
///
/// The tree is immutable and shared by all strings of one talk table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
    slots: Vec<i32>,
}

impl HuffTree {
    /// Parse a tree blob under the given byte order.
    ///
    /// Every node occupies eight bytes; trailing bytes that do not fill a
    /// whole node are ignored.
    pub fn new(data: &[u8], byte_order: ByteOrder) -> HuffTree {
        let nodes = data.len() / 8;

        let mut slots = vec![0i32; nodes * 2];
        byte_order.read_i32_into(&data[..nodes * 8], &mut slots);

        HuffTree { slots }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.slots.len() / 2
    }

    /// Whether the tree holds no nodes at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The child slot value of `node` for one extracted bit.
    fn child(&self, node: i32, bit: u32) -> Result<i32, HuffmanError> {
        match self.slots.get(node as usize * 2 + bit as usize) {
            Some(&child) => Ok(child),
            None => Err(HuffmanError::BadNode {
                node,
                count: self.node_count(),
            }),
        }
    }
}

/// A packed bitstream addressed by absolute bit index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    words: Vec<u32>,
}

impl BitStream {
    /// Parse a bitstream blob under the given byte order.
    ///
    /// Trailing bytes that do not fill a whole word are ignored.
    pub fn new(data: &[u8], byte_order: ByteOrder) -> BitStream {
        let count = data.len() / 4;

        let mut words = vec![0u32; count];
        byte_order.read_u32_into(&data[..count * 4], &mut words);

        BitStream { words }
    }

    /// Number of bits in the stream
    pub fn bit_len(&self) -> u64 {
        self.words.len() as u64 * 32
    }

    /// Whether the stream holds no bits at all
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The bit at the given absolute index
    fn bit(&self, cursor: u64) -> Result<u32, HuffmanError> {
        match self.words.get((cursor >> 5) as usize) {
            Some(&word) => Ok((word >> (cursor & 31)) & 1),
            None => Err(HuffmanError::BitOutOfRange {
                bit: cursor,
                len: self.bit_len(),
            }),
        }
    }
}

/// Decode one string from the bitstream, starting at the given bit offset.
///
/// Each character is decoded by walking the tree from the root, consuming one
/// bit per level, until a leaf is reached. The bit cursor carries over from
/// one character to the next while the walk restarts at the root. Decoding
/// stops at the terminator code 0, which is not part of the returned text.
///
/// A walk that leaves the tree, runs past the end of the bitstream or takes
/// more steps than the tree has nodes fails with a [`HuffmanError`]. Damage
/// to one string never touches the blobs, so other strings of the same table
/// stay decodable.
pub fn decode_string(
    tree: &HuffTree,
    bits: &BitStream,
    offset: u32,
) -> Result<String, HuffmanError> {
    let mut units: Vec<u16> = Vec::new();
    let mut cursor = u64::from(offset);

    loop {
        let (code, next) = decode_code(tree, bits, cursor)?;
        cursor = next;

        if code == 0 {
            break;
        }

        units.push(code);
    }

    Ok(U16String::from_vec(units).to_string_lossy())
}

/// Walk the tree once, yielding one code unit and the advanced cursor.
fn decode_code(tree: &HuffTree, bits: &BitStream, cursor: u64) -> Result<(u16, u64), HuffmanError> {
    let count = tree.node_count();
    if count == 0 {
        return Err(HuffmanError::EmptyTree);
    }

    // The root is the last node. A walk that has not reached a leaf after
    // visiting every node once can only be looping.
    let mut node = (count - 1) as i32;
    let mut cursor = cursor;

    for _ in 0..count {
        node = tree.child(node, bits.bit(cursor)?)?;
        cursor += 1;

        if node < 0 {
            // Leaves carry bias coded UTF-16: -1 is the terminator 0,
            // -66 is 'A'.
            return Ok(((0xFFFF - i64::from(node)) as u16, cursor));
        }
    }

    Err(HuffmanError::StepLimit(count))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use aurora_gff4::ByteOrder;

    use crate::error::HuffmanError;
    use crate::huffman::{decode_string, BitStream, HuffTree};

    fn tree(slots: &[i32]) -> HuffTree {
        let mut data = Vec::new();
        for slot in slots {
            data.extend_from_slice(&slot.to_le_bytes());
        }
        HuffTree::new(&data, ByteOrder::Little)
    }

    fn bits(words: &[u32]) -> BitStream {
        let mut data = Vec::new();
        for word in words {
            data.extend_from_slice(&word.to_le_bytes());
        }
        BitStream::new(&data, ByteOrder::Little)
    }

    #[test]
    fn parse_tree() {
        #[rustfmt::skip]
        let data = [
            0xBE, 0xFF, 0xFF, 0xFF, // -66, leaf 'A'
            0xFF, 0xFF, 0xFF, 0xFF, // -1, leaf terminator
        ];

        let tree = HuffTree::new(&data, ByteOrder::Little);
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.is_empty());
    }

    #[test]
    fn parse_tree_ignores_trailing_bytes() {
        let data = [0u8; 19];

        let tree = HuffTree::new(&data, ByteOrder::Little);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn parse_bitstream() {
        let stream = bits(&[0, 0, 0]);
        assert_eq!(stream.bit_len(), 96);
        assert!(!stream.is_empty());

        let empty = BitStream::new(&[], ByteOrder::Little);
        assert_eq!(empty.bit_len(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn decode_single_character() -> Result<(), HuffmanError> {
        // One node: bit 0 selects 'A', bit 1 the terminator.
        let tree = tree(&[-66, -1]);

        // Bit 0 is clear ('A'), bit 1 is set (terminator).
        let stream = bits(&[0b10]);

        assert_eq!(decode_string(&tree, &stream, 0)?, "A");

        Ok(())
    }

    #[test]
    fn decode_honors_start_offset() -> Result<(), HuffmanError> {
        let tree = tree(&[-66, -1]);

        // The same two bits, recorded at bit 3.
        let stream = bits(&[0b10000]);

        assert_eq!(decode_string(&tree, &stream, 3)?, "A");

        Ok(())
    }

    #[test]
    fn decode_terminator_only() -> Result<(), HuffmanError> {
        let tree = tree(&[-66, -1]);
        let stream = bits(&[0b1]);

        assert_eq!(decode_string(&tree, &stream, 0)?, "");

        Ok(())
    }

    #[test]
    fn decode_multiple_characters() -> Result<(), HuffmanError> {
        // Node 1 is the root: bit 0 selects 'H', bit 1 walks to node 0,
        // where bit 0 selects 'i' and bit 1 the terminator.
        let tree = tree(&[-106, -1, -73, 0]);

        // "Hi": 0, then 1 0, then the terminator 1 1.
        let stream = bits(&[0b11010]);

        assert_eq!(decode_string(&tree, &stream, 0)?, "Hi");

        Ok(())
    }

    #[test]
    fn decode_crosses_word_boundary() -> Result<(), HuffmanError> {
        let tree = tree(&[-66, -1]);

        // 32 'A' bits fill word 0, the terminator is bit 0 of word 1.
        let stream = bits(&[0, 0b1]);

        assert_eq!(decode_string(&tree, &stream, 0)?, "A".repeat(32));

        Ok(())
    }

    #[test]
    fn decode_big_endian_wire() -> Result<(), HuffmanError> {
        #[rustfmt::skip]
        let tree_data = [
            0xFF, 0xFF, 0xFF, 0xBE, // -66, leaf 'A'
            0xFF, 0xFF, 0xFF, 0xFF, // -1, leaf terminator
        ];
        #[rustfmt::skip]
        let bits_data = [
            0x00, 0x00, 0x00, 0x02, // bit 0 clear, bit 1 set
        ];

        let tree = HuffTree::new(&tree_data, ByteOrder::Big);
        let stream = BitStream::new(&bits_data, ByteOrder::Big);

        assert_eq!(decode_string(&tree, &stream, 0)?, "A");

        Ok(())
    }

    #[test]
    fn decode_empty_tree() {
        let tree = HuffTree::new(&[], ByteOrder::Little);
        let stream = bits(&[0b10]);

        let err = decode_string(&tree, &stream, 0).unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyTree));
    }

    #[test]
    fn decode_node_outside_tree() {
        // Bit 0 walks from the root (node 1) to node 5, which does not exist.
        let tree = tree(&[-66, -1, 5, -1]);
        let stream = bits(&[0b0]);

        let err = decode_string(&tree, &stream, 0).unwrap_err();
        assert!(matches!(err, HuffmanError::BadNode { node: 5, count: 2 }));
    }

    #[test]
    fn decode_cyclic_tree() {
        // Bit 0 walks from the root back to the root.
        let tree = tree(&[0, -1]);
        let stream = bits(&[0b0]);

        let err = decode_string(&tree, &stream, 0).unwrap_err();
        assert!(matches!(err, HuffmanError::StepLimit(1)));
    }

    #[test]
    fn decode_past_end_of_bitstream() {
        let tree = tree(&[-66, -1]);
        let stream = bits(&[0b0]);

        // A start offset past the single word of the stream.
        let err = decode_string(&tree, &stream, 32).unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::BitOutOfRange { bit: 32, len: 32 }
        ));
    }

    #[test]
    fn decode_never_terminating_stream() {
        // All bits select 'A'; the stream ends before a terminator shows up.
        let tree = tree(&[-66, -1]);
        let stream = bits(&[0b0]);

        let err = decode_string(&tree, &stream, 0).unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::BitOutOfRange { bit: 32, len: 32 }
        ));
    }
}
