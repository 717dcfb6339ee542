//! Main module for luksdump library functionality

pub mod ast;
pub mod classify;
pub mod config;
pub mod continuation;
pub mod devices;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod normalize;
pub mod parser;
pub mod testing;

pub use ast::{AttributeMap, Body, DumpTree, Entry, EntryTag, Header, Node, Section, Version};
pub use error::{DumpError, NotApplicable, ParseError};
