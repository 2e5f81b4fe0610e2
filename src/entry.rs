/// A key-value pair stored in a tree node. Nodes are ordered by `key` alone.
#[derive(Debug)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}

impl<T, U> Entry<T, U> {
    pub fn into_pair(self) -> (T, U) {
        (self.key, self.value)
    }
}
