//! Demo comments per platform, used when no live fetch is available.

use crate::types::{InboundComment, Platform};

fn sample(author: &str, text: &str, published_at: &str, likes: u64, platform: Platform) -> InboundComment {
  InboundComment {
    author: Some(author.into()),
    text: Some(text.into()),
    published_at: Some(published_at.into()),
    like_count: Some(likes),
    platform: Some(platform.as_str().into()),
    ..Default::default()
  }
}

/// Fixed sample comments for a platform. CSV has no samples of its own and gets the generic set.
pub fn demo_comments(platform: Platform) -> Vec<InboundComment> {
  use Platform::*;
  match platform {
    YouTube => vec![
      sample("User123", "Great video! Loved it.", "2023-01-01", 10, YouTube),
      sample("BotLike456", "Check my channel for free stuff! https://example.com", "2023-01-02", 0, YouTube),
      sample("RealFan", "This changed my perspective.", "2023-01-03", 5, YouTube),
      sample("SpamBot789", "Call now 1234567890 for deals!!!", "2023-01-04", 0, YouTube),
    ],
    Facebook => vec![
      sample("FriendA", "Nice post!", "2023-02-01", 15, Facebook),
      sample("PromoBot", "Follow me for more", "2023-02-02", 1, Facebook),
    ],
    Instagram => vec![
      sample("Follower1", "🔥🔥🔥", "2023-03-01", 20, Instagram),
      sample("FakeUser", "DM for collab", "2023-03-02", 0, Instagram),
    ],
    X => vec![
      sample("TweeterX", "Interesting thread.", "2023-04-01", 8, X),
      sample("BotTweet", "Visit my site: http://spam.com", "2023-04-02", 0, X),
    ],
    LinkedIn => vec![
      sample("Professional1", "Valuable insights.", "2023-05-01", 12, LinkedIn),
      sample("NetworkBot", "Connect with me for opportunities.", "2023-05-02", 2, LinkedIn),
    ],
    Csv => vec![sample("DefaultUser", "Sample comment.", "2023-06-01", 3, Csv)],
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::normalize;
  use crate::types::RawRecord;

  #[test]
  fn every_platform_has_normalizable_samples() {
    for p in [
      Platform::YouTube,
      Platform::Facebook,
      Platform::Instagram,
      Platform::X,
      Platform::LinkedIn,
      Platform::Csv,
    ] {
      let samples = demo_comments(p);
      assert!(!samples.is_empty());
      for s in samples {
        let c = normalize(&RawRecord::Api(s), p).unwrap();
        assert_eq!(c.source_platform, p);
        assert!(c.id.starts_with("cmt-"));
      }
    }
  }
}
