//! # Ember Assets
//!
//! Group-scoped resource indexing for the Ember engine core.
//!
//! This crate provides:
//! - The [`archive::Archive`] abstraction with filesystem and in-memory
//!   backends, registered through an [`archive::ArchiveManager`]
//! - Seekable [`stream::DataStream`]s tied to their backing store
//! - The [`manager::ResourceGroupManager`], which owns named groups of
//!   locations, declared resources, and created resources, and drives
//!   their initialise / load / unload lifecycle with listener callbacks
//!
//! Concrete resource kinds plug in by implementing
//! [`resource::ResourceManager`] and registering under a type tag.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod archive;
pub mod filesystem;
pub mod group;
pub mod listener;
pub mod manager;
pub mod memory;
pub mod pattern;
pub mod resource;
pub mod stream;

pub use archive::{Archive, ArchiveFactory, ArchiveManager, FileInfo};
pub use filesystem::FileSystemArchive;
pub use group::GroupStatus;
pub use listener::{ListenerHandle, LoadingListener, ResourceGroupListener};
pub use manager::{
    ResourceGroupManager, AUTODETECT_GROUP, DEFAULT_GROUP, INTERNAL_GROUP,
};
pub use memory::MemoryArchive;
pub use resource::{
    LoadingState, ManualResourceLoader, Resource, ResourceDeclaration, ResourceHandle,
    ResourceManager, ScriptLoader,
};
pub use stream::{DataStream, FileStream, MemoryStream, SharedStream};
