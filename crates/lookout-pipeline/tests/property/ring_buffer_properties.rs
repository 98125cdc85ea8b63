//! Property tests for the ring buffer.

use lookout_pipeline::ring_buffer::RingBuffer;
use proptest::prelude::*;

proptest! {
    #[test]
    fn never_exceeds_capacity(cap in 1usize..64, n in 0usize..256) {
        let mut buf = RingBuffer::new(cap);
        for i in 0..n {
            buf.push(i);
            prop_assert!(buf.len() <= cap);
        }
        prop_assert_eq!(buf.len(), n.min(cap));
    }

    #[test]
    fn keeps_most_recent_in_insertion_order(cap in 1usize..64, n in 0usize..256) {
        let mut buf = RingBuffer::new(cap);
        for i in 0..n {
            buf.push(i);
        }
        let expected: Vec<usize> = (n.saturating_sub(cap)..n).collect();
        prop_assert_eq!(buf.snapshot(), expected);
    }

    #[test]
    fn evicts_oldest_first(cap in 1usize..32, extra in 1usize..32) {
        let mut buf = RingBuffer::new(cap);
        for i in 0..cap {
            prop_assert_eq!(buf.push(i), None);
        }
        for j in 0..extra {
            prop_assert_eq!(buf.push(cap + j), Some(j));
        }
    }

    #[test]
    fn shrinking_keeps_newest(cap in 2usize..64, n in 0usize..128, new_cap in 1usize..64) {
        let mut buf = RingBuffer::new(cap);
        for i in 0..n {
            buf.push(i);
        }
        let before = buf.snapshot();
        buf.set_capacity(new_cap);
        let keep = before.len().min(new_cap);
        prop_assert_eq!(buf.snapshot(), before[before.len() - keep..].to_vec());
    }
}
