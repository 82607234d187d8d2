use log::debug;
use rand::Rng;

use crate::checked::{Checked, CheckedValue};
use crate::options::{RandomValue, Write, WriteValue};
use crate::Result;

/// Base of the relic table entries a random relic write may point at.
const RELIC_TABLE_BASE: u32 = 0xa063_0664;
const RELIC_TABLE_LEN: u32 = 29;

pub fn roll(kind: RandomValue, rng: &mut impl Rng) -> CheckedValue {
    match kind {
        RandomValue::Char => CheckedValue::Char(rng.gen()),
        RandomValue::Bit => CheckedValue::Char(rng.gen_range(0..=1)),
        RandomValue::UpTo3 => CheckedValue::Char(rng.gen_range(0..=3)),
        RandomValue::UpTo10 => CheckedValue::Char(rng.gen_range(1..=10)),
        RandomValue::UpTo99 => CheckedValue::Char(rng.gen_range(1..=99)),
        RandomValue::Short => CheckedValue::Short(rng.gen()),
        RandomValue::Word => CheckedValue::Word(rng.gen()),
        RandomValue::Relic => CheckedValue::Word(RELIC_TABLE_BASE + rng.gen_range(0..RELIC_TABLE_LEN)),
        RandomValue::Long => CheckedValue::Long(rng.gen()),
    }
}

/// Resolve raw writes into a buffer, rolling random values in order.
pub fn apply_writes(writes: &[Write], rng: &mut impl Rng) -> Result<Checked> {
    let mut checked = Checked::new();
    for write in writes {
        let value = match &write.value {
            WriteValue::Char(v) => CheckedValue::Char(*v),
            WriteValue::Short(v) => CheckedValue::Short(*v),
            WriteValue::Word(v) => CheckedValue::Word(*v),
            WriteValue::Long(v) => CheckedValue::Long(*v),
            WriteValue::Bytes(bytes) => CheckedValue::Bytes(bytes.clone()),
            WriteValue::Random(kind) => roll(*kind, rng),
        };
        debug!("write 0x{:08x}: {:?}", write.address, value);
        checked.write(write.address, value)?;
    }
    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..500 {
            match roll(RandomValue::UpTo10, &mut rng) {
                CheckedValue::Char(v) => assert!((1..=10).contains(&v)),
                other => panic!("unexpected {:?}", other),
            }
            match roll(RandomValue::UpTo99, &mut rng) {
                CheckedValue::Char(v) => assert!((1..=99).contains(&v)),
                other => panic!("unexpected {:?}", other),
            }
            match roll(RandomValue::Bit, &mut rng) {
                CheckedValue::Char(v) => assert!(v <= 1),
                other => panic!("unexpected {:?}", other),
            }
            match roll(RandomValue::Relic, &mut rng) {
                CheckedValue::Word(v) => {
                    assert!((RELIC_TABLE_BASE..RELIC_TABLE_BASE + RELIC_TABLE_LEN).contains(&v))
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn fixed_writes_keep_their_width() {
        let writes = vec![
            Write { address: 0x047a_3098, value: WriteValue::Word(0x96) },
            Write { address: 0x047d_be84, value: WriteValue::Char(8) },
            Write { address: 0x047a_309c, value: WriteValue::Bytes(vec![1, 0]) },
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let checked = apply_writes(&writes, &mut rng).unwrap();
        assert_eq!(checked.len(), 3);
        assert_eq!(checked.get(0x047a_3098), Some(&CheckedValue::Word(0x96)));
        assert_eq!(checked.get(0x047a_309c), Some(&CheckedValue::Bytes(vec![1, 0])));
    }

    #[test]
    fn rolls_are_reproducible() {
        let writes = vec![Write { address: 0x10_0000, value: WriteValue::Random(RandomValue::Long) }];
        let a = apply_writes(&writes, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        let b = apply_writes(&writes, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }
}
