use crate::room_map::truncate_bytes;

pub const BUCKET_COUNT: usize = 7;
pub const SUSPECT_NAME_LIMIT: usize = 49;

/// Polynomial string hash over the UTF-8 bytes of `name`, reduced to a bucket.
///
/// Only ASCII letters are folded to lowercase. Each byte is widened as a
/// signed 8-bit value, so bytes above 0x7f contribute negatively, and the
/// arithmetic wraps at 32 bits.
pub fn bucket_index(name: &str) -> usize {
    let hash = name.bytes().fold(0u32, |hash, byte| {
        let byte = byte.to_ascii_lowercase() as i8 as i32 as u32;
        hash.wrapping_mul(31).wrapping_add(byte)
    });
    hash as usize % BUCKET_COUNT
}

#[derive(Debug)]
pub struct Suspect {
    name: String,
    clue_count: u32,
    next: Option<Box<Suspect>>,
}

impl Suspect {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clue_count(&self) -> u32 {
        self.clue_count
    }
}

impl Drop for Suspect {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

/// Suspect name → clue count, in a fixed array of chained buckets.
/// Never resized; colliding names share a chain.
#[derive(Debug, Default)]
pub struct SuspectTally {
    buckets: [Option<Box<Suspect>>; BUCKET_COUNT],
    len: usize,
}

impl SuspectTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the suspect called `name`, prepending a fresh zero-count node
    /// to its bucket if none exists yet.
    pub fn find_or_create(&mut self, name: &str) -> &mut Suspect {
        let name = truncate_bytes(name, SUSPECT_NAME_LIMIT);
        let index = bucket_index(&name);
        let depth = self.chain(index).position(|suspect| suspect.name == name);

        match (depth, &mut self.buckets[index]) {
            (Some(depth), Some(head)) => nth_in_chain(head, depth),
            (_, head) => {
                let next = head.take();
                self.len += 1;
                head.insert(Box::new(Suspect {
                    name,
                    clue_count: 0,
                    next,
                }))
            }
        }
    }

    /// Records one more clue against `name` and returns the new count.
    pub fn increment(&mut self, name: &str) -> u32 {
        let suspect = self.find_or_create(name);
        suspect.clue_count += 1;
        suspect.clue_count
    }

    pub fn get(&self, name: &str) -> Option<&Suspect> {
        self.chain(bucket_index(name)).find(|suspect| suspect.name == name)
    }

    pub fn count_of(&self, name: &str) -> u32 {
        self.get(name).map_or(0, Suspect::clue_count)
    }

    /// Suspects in one bucket, head first (most recently created first).
    pub fn chain(&self, index: usize) -> impl Iterator<Item = &Suspect> {
        let mut cursor = self.buckets.get(index).and_then(|head| head.as_deref());
        std::iter::from_fn(move || {
            let suspect = cursor?;
            cursor = suspect.next.as_deref();
            Some(suspect)
        })
    }

    /// Every suspect, by bucket index then chain order.
    pub fn iter(&self) -> impl Iterator<Item = &Suspect> {
        (0..BUCKET_COUNT).flat_map(move |index| self.chain(index))
    }

    /// The suspect with the strictly highest count; ties keep the first one
    /// met in scan order. `None` while nobody has a clue.
    pub fn most_likely(&self) -> Option<&Suspect> {
        let mut best: Option<&Suspect> = None;
        for suspect in self.iter() {
            if best.is_none_or(|current| suspect.clue_count > current.clue_count) {
                best = Some(suspect);
            }
        }
        best.filter(|suspect| suspect.clue_count > 0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn nth_in_chain(mut node: &mut Suspect, depth: usize) -> &mut Suspect {
    for _ in 0..depth {
        match node.next {
            Some(ref mut next) => node = &mut **next,
            None => break,
        }
    }
    node
}
