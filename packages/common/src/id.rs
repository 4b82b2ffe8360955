use crc32fast::Hasher;

/// Derive a stable seed from a project identifier using CRC32
pub fn get_project_seed(project_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(project_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a fresh project id from a name and a timestamp
pub fn new_project_id(name: &str, timestamp_ms: u64) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&timestamp_ms.to_le_bytes());
    format!("proj-{:x}", hasher.finalize())
}

/// Sequential ID generator for components within a project
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Project seed (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(project_id: &str) -> Self {
        Self {
            seed: get_project_seed(project_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Get the project seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_seed_is_stable() {
        let a = get_project_seed("proj-1");
        let b = get_project_seed("proj-1");
        assert_eq!(a, b);

        let c = get_project_seed("proj-2");
        assert_ne!(a, c);
    }

    #[test]
    fn test_sequential_ids_are_unique() {
        let mut ids = IdGenerator::new("proj-1");
        let first = ids.new_id();
        let second = ids.new_id();

        assert_ne!(first, second);
        assert!(first.ends_with("-1"));
        assert!(second.ends_with("-2"));
    }

    #[test]
    fn test_same_seed_generates_same_sequence() {
        let mut a = IdGenerator::new("proj-1");
        let mut b = IdGenerator::new("proj-1");

        assert_eq!(a.new_id(), b.new_id());
    }
}
