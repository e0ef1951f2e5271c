//! Virtual address space shared by every repository.
//!
//! Local checkouts live anywhere on disk. Links are resolved in a synthetic
//! address space rooted at `~`, the common ancestor of every repository, so
//! that output links are independent of the checkout location.
//!
//! # Architecture
//!
//! ```text
//! Local Paths                           Virtual Addresses
//! ===========                           =================
//! /home/me/src/Stack/Repo1          <->  ~/Repo1
//! /home/me/src/Stack/Repo1/a.md     <->  ~/Repo1/a.md
//! /home/me/src/Outside              ->   ~/../Outside   (fails on resolution)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let root = VirtualRoot::compute(repositories.iter().map(|r| r.local_root()));
//! let address = root.attach(&document_path)?;
//! let local = root.to_local(&address)?;
//! ```

mod space;

pub use space::VirtualRoot;
