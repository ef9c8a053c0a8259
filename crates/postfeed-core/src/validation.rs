//! Checks applied by every store before a post is committed

use crate::{PostError, Result};
use postfeed_types::NewPost;

/// A post needs text content or a hosted file URL. Values are stored as given;
/// an empty string still counts as present.
pub fn validate_new_post(post: &NewPost) -> Result<()> {
    if post.content.is_none() && post.url.is_none() {
        return Err(PostError::validation("content or an uploaded file is required"));
    }

    Ok(())
}
