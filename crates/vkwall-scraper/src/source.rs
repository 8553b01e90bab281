//! The narrow capability the collector needs from a post provider.

use std::future::Future;

use crate::client::VkClient;
use crate::error::VkError;
use crate::types::{CommunityInfo, UserInfo, WallPage};

/// A remote source of community metadata and wall pages.
///
/// [`VkClient`] is the production implementation; tests substitute
/// in-memory fakes.
pub trait PostSource {
    /// Resolves a screen name or numeric id to zero or more communities.
    fn lookup_community(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Vec<CommunityInfo>, VkError>> + Send;

    /// The account behind the credentials, used only for validation.
    fn get_self(&self) -> impl Future<Output = Result<UserInfo, VkError>> + Send;

    /// One page of a wall, newest first.
    fn list_posts(
        &self,
        owner_id: i64,
        count: u32,
        offset: u32,
    ) -> impl Future<Output = Result<WallPage, VkError>> + Send;
}

impl PostSource for VkClient {
    fn lookup_community(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Vec<CommunityInfo>, VkError>> + Send {
        VkClient::lookup_community(self, identifier)
    }

    fn get_self(&self) -> impl Future<Output = Result<UserInfo, VkError>> + Send {
        VkClient::get_self(self)
    }

    fn list_posts(
        &self,
        owner_id: i64,
        count: u32,
        offset: u32,
    ) -> impl Future<Output = Result<WallPage, VkError>> + Send {
        VkClient::list_posts(self, owner_id, count, offset)
    }
}
