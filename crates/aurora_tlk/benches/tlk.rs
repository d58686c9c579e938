use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

pub mod huffman {
    use aurora_tlk::huffman::{decode_string, BitStream, HuffTree};
    use aurora_tlk::ByteOrder;
    use divan::Bencher;

    /// A four node comb tree over 'A' to 'D' and the terminator.
    fn tree_bytes() -> Vec<u8> {
        [-69i32, -1, -68, 0, -67, 1, -66, 2]
            .into_iter()
            .flat_map(|slot| slot.to_le_bytes())
            .collect()
    }

    /// "ABCD" repeated `repeats` times, coded against the comb tree.
    fn stream_bytes(repeats: usize) -> Vec<u8> {
        let codes: [&[bool]; 4] = [
            &[false],
            &[true, false],
            &[true, true, false],
            &[true, true, true, false],
        ];

        let mut bits = Vec::new();
        for _ in 0..repeats {
            for code in codes {
                bits.extend_from_slice(code);
            }
        }
        bits.extend_from_slice(&[true; 4]); // terminator

        let mut words = vec![0u32; bits.len().div_ceil(32)];
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                words[i >> 5] |= 1 << (i & 31);
            }
        }

        words.into_iter().flat_map(|word| word.to_le_bytes()).collect()
    }

    #[divan::bench]
    fn parse(bencher: Bencher) {
        bencher
            .with_inputs(|| (tree_bytes(), stream_bytes(64)))
            .bench_refs(|(tree, stream)| {
                divan::black_box((
                    HuffTree::new(tree, ByteOrder::Little),
                    BitStream::new(stream, ByteOrder::Little),
                ));
            });
    }

    #[divan::bench]
    fn decode(bencher: Bencher) {
        let tree = HuffTree::new(&tree_bytes(), ByteOrder::Little);
        let stream = BitStream::new(&stream_bytes(64), ByteOrder::Little);

        bencher.bench_local(move || {
            divan::black_box(decode_string(&tree, &stream, 0).unwrap());
        });
    }
}

pub mod read {
    use aurora_tlk::{Encoding, StrRef, TalkTable, TlkTalkTable};
    use divan::Bencher;

    /// A plain row table whose rows all point at one shared text slice.
    fn table_bytes(rows: u32) -> Vec<u8> {
        let text = b"What would you ask of me?";

        let mut file = Vec::new();
        file.extend_from_slice(b"TLK ");
        file.extend_from_slice(b"V3.0");
        file.extend_from_slice(&0u32.to_le_bytes());
        file.extend_from_slice(&rows.to_le_bytes());
        file.extend_from_slice(&(20 + rows * 40).to_le_bytes());

        for _ in 0..rows {
            file.extend_from_slice(&1u32.to_le_bytes());
            file.extend_from_slice(&[0u8; 24]);
            file.extend_from_slice(&0u32.to_le_bytes());
            file.extend_from_slice(&(text.len() as u32).to_le_bytes());
            file.extend_from_slice(&0u32.to_le_bytes());
        }

        file.extend_from_slice(text);

        file
    }

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher.with_inputs(|| table_bytes(1024)).bench_refs(|data| {
            divan::black_box(TlkTalkTable::new(data.as_slice(), Some(Encoding::Latin1)).unwrap());
        });
    }

    #[divan::bench]
    fn string_first(bencher: Bencher) {
        bencher
            .with_inputs(|| {
                TlkTalkTable::new(table_bytes(1024).as_slice(), Some(Encoding::Latin1)).unwrap()
            })
            .bench_refs(|table| {
                divan::black_box(table.string(StrRef::new(512)));
            });
    }

    #[divan::bench]
    fn string_cached(bencher: Bencher) {
        let table =
            TlkTalkTable::new(table_bytes(1024).as_slice(), Some(Encoding::Latin1)).unwrap();
        let strref = StrRef::new(512);
        table.string(strref);

        bencher.bench_local(move || divan::black_box(table.string(strref)));
    }
}
