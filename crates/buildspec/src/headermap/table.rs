use indexmap::IndexMap;

const MAGIC: u32 = u32::from_be_bytes(*b"hmap");
const VERSION: u16 = 1;
const HEADER_SIZE: usize = 24;
const BUCKET_SIZE: usize = 12;

/// Where a header map entry points: `prefix` is the directory (with trailing `/`), `suffix`
/// the file name
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct HeaderEntry {
    pub prefix: String,
    pub suffix: String,
}

/// Insertion ordered table from `#include` names to header locations
///
/// Adding a name that is already present replaces its entry; the name keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    entries: IndexMap<String, HeaderEntry>,
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        key: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) {
        self.entries
            .insert(key.into(), HeaderEntry::new(prefix.into(), suffix.into()));
    }

    pub fn get(&self, key: &str) -> Option<&HeaderEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize in the clang header map layout (little endian)
    ///
    /// A 24 byte header, a power of two sized array of open addressed buckets and a string
    /// table. String offsets are relative to the string table, whose first byte is NUL so that
    /// offset 0 marks an empty bucket.
    pub fn write(&self) -> Vec<u8> {
        let num_buckets = (self.entries.len() * 2).max(8).next_power_of_two();
        let mut buckets = vec![[0u32; 3]; num_buckets];

        let mut strings = StringTable::default();
        let mut max_value_length = 0;

        for (key, entry) in &self.entries {
            let bucket = [
                strings.intern(key),
                strings.intern(&entry.prefix),
                strings.intern(&entry.suffix),
            ];
            max_value_length = max_value_length.max(entry.prefix.len() + entry.suffix.len());

            let mut index = hash_key(key) as usize & (num_buckets - 1);
            while buckets[index][0] != 0 {
                index = (index + 1) & (num_buckets - 1);
            }
            buckets[index] = bucket;
        }

        let strings_offset = HEADER_SIZE + num_buckets * BUCKET_SIZE;
        let mut out = Vec::with_capacity(strings_offset + strings.bytes.len());
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(strings_offset as u32).to_le_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&(num_buckets as u32).to_le_bytes());
        out.extend_from_slice(&(max_value_length as u32).to_le_bytes());
        for bucket in buckets {
            for offset in bucket {
                out.extend_from_slice(&offset.to_le_bytes());
            }
        }
        out.extend_from_slice(&strings.bytes);
        out
    }
}

/// Case insensitive key hash used for bucket selection
fn hash_key(key: &str) -> u32 {
    key.bytes().fold(0u32, |hash, byte| {
        hash.wrapping_add(u32::from(byte.to_ascii_lowercase()).wrapping_mul(13))
    })
}

struct StringTable {
    bytes: Vec<u8>,
    offsets: IndexMap<String, u32>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self {
            bytes: vec![0],
            offsets: IndexMap::new(),
        }
    }
}

impl StringTable {
    fn intern(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        if let Some(offset) = self.offsets.get(value) {
            return *offset;
        }

        let offset = self.bytes.len() as u32;
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
        self.offsets.insert(value.to_string(), offset);
        offset
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn c_str_at(bytes: &[u8], offset: usize) -> &str {
        let end = bytes[offset..].iter().position(|b| *b == 0).unwrap();
        std::str::from_utf8(&bytes[offset..offset + end]).unwrap()
    }

    /// Lookup the way a compiler reads the table
    fn lookup(bytes: &[u8], key: &str) -> Option<String> {
        let strings = u32_at(bytes, 8) as usize;
        let num_buckets = u32_at(bytes, 16) as usize;

        let mut index = hash_key(key) as usize & (num_buckets - 1);
        for _ in 0..num_buckets {
            let bucket = HEADER_SIZE + index * BUCKET_SIZE;
            let key_offset = u32_at(bytes, bucket) as usize;
            if key_offset == 0 {
                return None;
            }
            if c_str_at(bytes, strings + key_offset).eq_ignore_ascii_case(key) {
                let prefix = c_str_at(bytes, strings + u32_at(bytes, bucket + 4) as usize);
                let suffix = c_str_at(bytes, strings + u32_at(bytes, bucket + 8) as usize);
                return Some(format!("{prefix}{suffix}"));
            }
            index = (index + 1) & (num_buckets - 1);
        }
        None
    }

    #[test]
    fn later_insert_overwrites() {
        let mut table = HeaderTable::new();
        table.add("Foo.h", "/a/", "Foo.h");
        table.add("Bar.h", "/a/", "Bar.h");
        table.add("Foo.h", "/b/", "Foo.h");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Foo.h"), Some(&HeaderEntry::new("/b/".into(), "Foo.h".into())));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["Foo.h", "Bar.h"]);
    }

    #[test]
    fn empty_table_header() {
        let bytes = HeaderTable::new().write();

        assert_eq!(&bytes[0..4], b"pamh");
        assert_eq!(u32_at(&bytes, 12), 0);
        assert_eq!(u32_at(&bytes, 16), 8);
        assert_eq!(bytes.len(), HEADER_SIZE + 8 * BUCKET_SIZE + 1);
    }

    #[test]
    fn written_entries_can_be_found() {
        let mut table = HeaderTable::new();
        for i in 0..20 {
            table.add(format!("Header{i}.h"), "/include/", format!("Header{i}.h"));
        }
        table.add("App/Header3.h", "/src/", "Header3.h");
        table.add("Header0.h", "/override/", "Header0.h");

        let bytes = table.write();
        assert_eq!(u32_at(&bytes, 12), 21);
        assert_eq!(u32_at(&bytes, 20), "/override/Header0.h".len() as u32);

        assert_eq!(lookup(&bytes, "Header7.h").as_deref(), Some("/include/Header7.h"));
        assert_eq!(lookup(&bytes, "header7.H").as_deref(), Some("/include/Header7.h"));
        assert_eq!(lookup(&bytes, "App/Header3.h").as_deref(), Some("/src/Header3.h"));
        assert_eq!(lookup(&bytes, "Header0.h").as_deref(), Some("/override/Header0.h"));
        assert_eq!(lookup(&bytes, "Missing.h"), None);
    }
}
