//! Basic usage of the blobfs facade.
//!
//! Maps client paths under `/models` onto an in-memory store, with `bnc`
//! registered as a pseudo-directory.
//!
//! Run with: `cargo run --example basic_usage`

use blobfs::*;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), FsError> {
    let storage = MemoryStorage::new();
    storage.insert("sub/file.txt", "hello world");
    storage.insert("bncdata.sci", "0123456789");

    let fs = ObjectFs::new(PathMapper::new("/models").with_pseudo_dirs(["bnc"]), storage);

    // =========================================================================
    // Path mapping
    // =========================================================================

    for path in ["/models/sub/file.txt", "/models/bnc/data.sci", "/other/file.txt"] {
        match fs.mapper().convert(path) {
            Some(key) => println!("{path} -> key {key:?}"),
            None => println!("{path} -> outside the root"),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    let root = Path::new("/models");
    println!("is_dir(/models) = {}", fs.is_dir(root).await?);
    println!("is_dir(/models/bnc) = {}", fs.is_dir(Path::new("/models/bnc")).await?);

    let file = Path::new("/models/bnc/data.sci");
    println!("exists({}) = {}", file.display(), fs.exists(file).await?);
    println!("size({}) = {}", file.display(), fs.size(file).await?);

    let bytes = fs.read_all(Path::new("/models/sub/file.txt"), ByteRange::new(6, 5)).await?;
    println!("bytes 6..11 of sub/file.txt = {:?}", String::from_utf8_lossy(&bytes));

    // =========================================================================
    // Errors
    // =========================================================================

    if let Err(e) = fs.size(root).await {
        println!("size(/models) -> {e}");
    }
    if let Err(e) = fs.get_children(root).await {
        println!("get_children(/models) -> {e}");
    }

    Ok(())
}
