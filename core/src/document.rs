use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A document the index can hold. Every variant knows which of its fields are searchable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Document {
    Plain(PlainDocument),
    Article(Article),
    Topic(Topic),
    Trec(TrecDocument),
}

impl Document {
    pub fn plain(text: impl Into<String>) -> Self {
        Document::Plain(PlainDocument { text: text.into() })
    }

    pub fn relevant_text(&self) -> Cow<'_, str> {
        match self {
            Document::Plain(doc) => Cow::Borrowed(&doc.text),
            Document::Article(article) => Cow::Owned(article.relevant_text()),
            Document::Topic(topic) => Cow::Borrowed(&topic.title),
            Document::Trec(doc) => Cow::Owned(format!("{} {}", doc.title, doc.text)),
        }
    }

    /// Identifier assigned by the collection the document came from, if any.
    pub fn external_id(&self) -> Option<&str> {
        match self {
            Document::Topic(topic) => Some(&topic.id),
            Document::Trec(doc) => Some(&doc.id),
            Document::Plain(_) | Document::Article(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainDocument {
    pub text: String,
}

/// News article with comments attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub headline: String,
    pub opener: String,
    pub text: String,
    pub published: String,
    pub modified: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub related: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Article {
    /// Headline, opener and body on separate lines, then the tags.
    /// Authors, related articles and comments are not searchable.
    fn relevant_text(&self) -> String {
        let mut s = format!("{}\n{}\n{}\n", self.headline, self.opener, self.text);
        for tag in &self.tags {
            s.push_str(tag);
            s.push(' ');
        }
        s.push('\n');
        s
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub text: String,
    pub timestamp: String,
    pub author: String,
    pub positive: i32,
    pub negative: i32,
}

/// TREC evaluation topic. Only the title is used as query text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    #[serde(alias = "topic_id", alias = "TopicId", alias = "Id")]
    pub id: String,
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "Narrative")]
    pub narrative: String,
    #[serde(alias = "Lang")]
    pub lang: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrecDocument {
    #[serde(alias = "Id", alias = "DocumentId", alias = "document_id")]
    pub id: String,
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Text")]
    pub text: String,
    #[serde(alias = "Date")]
    pub date: String,
}

impl From<PlainDocument> for Document {
    fn from(doc: PlainDocument) -> Self {
        Document::Plain(doc)
    }
}

impl From<Article> for Document {
    fn from(article: Article) -> Self {
        Document::Article(article)
    }
}

impl From<Topic> for Document {
    fn from(topic: Topic) -> Self {
        Document::Topic(topic)
    }
}

impl From<TrecDocument> for Document {
    fn from(doc: TrecDocument) -> Self {
        Document::Trec(doc)
    }
}
