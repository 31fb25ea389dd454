//
//  bitbucket-context
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket API Module
//!
//! HTTP access to the two Bitbucket platforms, reduced to the handful of
//! lookups needed to resolve a context URL.
//!
//! ## Module Structure
//!
//! - [`client`]: [`BitbucketClient`], the shared HTTP wrapper
//! - [`hosting`]: the [`HostingApi`] capability trait and the records it returns
//! - [`factory`]: [`ApiFactory`], building an authenticated [`HostingApi`] per user
//! - [`cloud`]: Bitbucket Cloud (API 2.0) implementation
//! - [`server`]: Bitbucket Server/Data Center (API 1.0) implementation
//! - [`common`]: errors and pagination shared by both
//!
//! ## Platform Differences
//!
//! | Lookup | Cloud | Server/DC |
//! |--------|-------|-----------|
//! | Repository | `/repositories/{workspace}/{slug}` | `/projects/{key}/repos/{slug}` |
//! | Tip commit | `/commits/{ref}?pagelen=1` | `/commits?until={ref}&limit=1` |
//! | Entry type | `/src/{rev}/{path}?format=meta` | `/browse/{path}?at={rev}&type=true` |
//! | Fork parent | `parent.full_name` | not supported |
//! | Default branch | `mainbranch` | `/branches/default` (opt-in) |

pub mod client;
pub mod cloud;
pub mod common;
pub mod factory;
pub mod hosting;
pub mod server;

pub use client::BitbucketClient;
pub use common::ApiError;
pub use factory::*;
pub use hosting::*;
