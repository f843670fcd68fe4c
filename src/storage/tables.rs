/// Name of the database file inside the data directory
pub const DATABASE_FILE: &str = "linkeater.redb";

/// Primary partition: url -> Link (msgpack), every url ever seen
pub const URLS: &str = "urls";

/// Author partitions are named `author:<name>` so a poster can never shadow `urls`.
const AUTHOR_PREFIX: &str = "author:";

/// Partition holding the links first posted by `author`: url -> Link (msgpack)
pub fn author_partition(author: &str) -> String {
    format!("{AUTHOR_PREFIX}{author}")
}

/// Inverse of [`author_partition`]; `None` for partitions that aren't author partitions.
pub fn author_of_partition(name: &str) -> Option<&str> {
    name.strip_prefix(AUTHOR_PREFIX)
}
