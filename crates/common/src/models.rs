use time::OffsetDateTime;

/// Article from the aggregation stream, ranked by engagement.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedArticle {
    pub title: String,
    pub url: String,
    pub engagement: i64,
    pub published: OffsetDateTime,
}

/// Page seen by the analytics source. Carries no ranking information.
#[derive(Debug, Clone, PartialEq)]
pub struct PageArticle {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Feed(FeedArticle),
    Page(PageArticle),
}

impl Candidate {
    pub fn title(&self) -> &str {
        match self {
            Candidate::Feed(article) => &article.title,
            Candidate::Page(article) => &article.title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Candidate::Feed(article) => &article.url,
            Candidate::Page(article) => &article.url,
        }
    }

    pub fn ranking_key(&self) -> Option<i64> {
        match self {
            Candidate::Feed(article) => Some(article.engagement),
            Candidate::Page(_) => None,
        }
    }

    /// Text of the social post: title followed by the link.
    pub fn status_text(&self) -> String {
        format!("{} {}", self.title(), self.url())
    }
}

impl From<FeedArticle> for Candidate {
    fn from(article: FeedArticle) -> Self {
        Candidate::Feed(article)
    }
}

impl From<PageArticle> for Candidate {
    fn from(article: PageArticle) -> Self {
        Candidate::Page(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_view() {
        let feed: Candidate = FeedArticle {
            title: "Rust 2024".to_string(),
            url: "https://blog.example.com/rust".to_string(),
            engagement: 42,
            published: OffsetDateTime::UNIX_EPOCH,
        }
        .into();
        let page: Candidate = PageArticle {
            title: "Local news".to_string(),
            url: "https://site.example.com/news/local".to_string(),
        }
        .into();

        assert_eq!(feed.ranking_key(), Some(42));
        assert_eq!(page.ranking_key(), None);
        assert_eq!(feed.status_text(), "Rust 2024 https://blog.example.com/rust");
        assert_eq!(page.url(), "https://site.example.com/news/local");
    }
}
