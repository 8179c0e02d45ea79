//! In-memory implementation of every repository port
//!
//! All repositories share one set of tables behind a mutex. A transaction
//! works on a private copy of the tables it may write and applies its own
//! changes on commit; dropping it discards the copy.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use conduit_core::{
    Article, ArticleId, ArticlePage, ArticleQuery, ArticleRepository, Comment, CommentId,
    CommentRepository, DomainError, FavoriteRepository, FollowRepository, NewArticle, NewComment,
    NewUser, RepoResult, Tag, TagId, Transaction, UnitOfWork, User, UserChanges, UserId,
    UserRepository,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Tables a transaction may write
#[derive(Debug, Clone, Default)]
struct ContentTables {
    articles: BTreeMap<ArticleId, Article>,
    tags: BTreeMap<TagId, Tag>,
    article_tags: BTreeSet<(ArticleId, TagId)>,
    favorites: BTreeSet<(UserId, ArticleId)>,
    comments: BTreeMap<CommentId, Comment>,
}

impl ContentTables {
    /// Apply the rows `working` changed relative to `base`, leaving rows
    /// written outside the transaction alone
    fn apply(&mut self, base: &ContentTables, working: ContentTables) {
        merge_rows(&mut self.articles, &base.articles, working.articles);
        merge_rows(&mut self.tags, &base.tags, working.tags);
        merge_links(&mut self.article_tags, &base.article_tags, &working.article_tags);
        merge_links(&mut self.favorites, &base.favorites, &working.favorites);
        merge_rows(&mut self.comments, &base.comments, working.comments);
    }
}

fn merge_rows<K: Ord, V: PartialEq>(
    live: &mut BTreeMap<K, V>,
    base: &BTreeMap<K, V>,
    working: BTreeMap<K, V>,
) {
    for key in base.keys() {
        if !working.contains_key(key) {
            live.remove(key);
        }
    }
    for (key, value) in working {
        if base.get(&key) != Some(&value) {
            live.insert(key, value);
        }
    }
}

fn merge_links<T: Ord + Clone>(live: &mut BTreeSet<T>, base: &BTreeSet<T>, working: &BTreeSet<T>) {
    for removed in base.difference(working) {
        live.remove(removed);
    }
    for added in working.difference(base) {
        live.insert(added.clone());
    }
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<UserId, StoredUser>,
    follows: BTreeSet<(UserId, UserId)>,
    content: ContentTables,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_id_by_name(&self, username: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|stored| stored.user.username == username)
            .map(|stored| stored.user.id)
    }
}

/// Shared in-memory store. Cloning yields another handle to the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_next_commit: Arc<AtomicBool>,
    fail_next_tag_link: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `commit` fail, leaving the tables untouched
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Make the next `link_tag` fail the way a broken foreign key would
    pub fn fail_next_tag_link(&self) {
        self.fail_next_tag_link.store(true, Ordering::SeqCst);
    }

    /// Number of tag links held by an article
    pub fn article_tag_count(&self, article_id: ArticleId) -> usize {
        self.tables
            .lock()
            .content
            .article_tags
            .iter()
            .filter(|(a, _)| *a == article_id)
            .count()
    }

    /// Number of favorite rows pointing at an article
    pub fn favorite_rows(&self, article_id: ArticleId) -> usize {
        self.tables
            .lock()
            .content
            .favorites
            .iter()
            .filter(|(_, a)| *a == article_id)
            .count()
    }

    /// Number of comments on an article
    pub fn comment_rows(&self, article_id: ArticleId) -> usize {
        self.tables
            .lock()
            .content
            .comments
            .values()
            .filter(|c| c.article_id == article_id)
            .count()
    }

    /// Every stored slug, drafts included
    pub fn slugs(&self) -> Vec<String> {
        self.tables
            .lock()
            .content
            .articles
            .values()
            .map(|a| a.slug.clone())
            .collect()
    }

    /// Names of every tag ever created
    pub fn tag_names(&self) -> Vec<String> {
        self.tables
            .lock()
            .content
            .tags
            .values()
            .map(|t| t.name.clone())
            .collect()
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.tables.lock().users.len()
    }
}

// ============================================================================
// Users and follows
// ============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.tables.lock().users.get(&id).map(|s| s.user.clone()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<User>> {
        let tables = self.tables.lock();
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .map(|s| s.user.clone())
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables
            .user_id_by_name(username)
            .and_then(|id| tables.users.get(&id))
            .map(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .lock()
            .users
            .values()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.lock();
        if tables.users.values().any(|s| s.user.username == user.username) {
            return Err(DomainError::UsernameTaken);
        }
        if tables.users.values().any(|s| s.user.email == user.email) {
            return Err(DomainError::EmailTaken);
        }

        let id = UserId::new(tables.allocate_id());
        let created = User {
            id,
            username: user.username,
            email: user.email,
            name: user.name,
            bio: None,
            image: None,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        tables.users.insert(
            id,
            StoredUser {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> RepoResult<User> {
        let mut tables = self.tables.lock();
        let others = || tables.users.values().filter(move |s| s.user.id != id);

        if let Some(username) = &changes.username {
            if others().any(|s| &s.user.username == username) {
                return Err(DomainError::UsernameTaken);
            }
        }
        if let Some(email) = &changes.email {
            if others().any(|s| &s.user.email == email) {
                return Err(DomainError::EmailTaken);
            }
        }

        let stored = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))?;
        changes.apply(&mut stored.user, Utc::now());
        if let Some(hash) = changes.password_hash {
            stored.password_hash = hash;
        }
        Ok(stored.user.clone())
    }

    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        Ok(self
            .tables
            .lock()
            .users
            .get(&id)
            .map(|s| s.password_hash.clone()))
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn exists(&self, follower: UserId, following: UserId) -> RepoResult<bool> {
        Ok(self.tables.lock().follows.contains(&(follower, following)))
    }

    async fn following_among(
        &self,
        follower: UserId,
        candidates: &[UserId],
    ) -> RepoResult<HashSet<UserId>> {
        let tables = self.tables.lock();
        Ok(candidates
            .iter()
            .copied()
            .filter(|c| tables.follows.contains(&(follower, *c)))
            .collect())
    }

    async fn create(&self, follower: UserId, following: UserId) -> RepoResult<()> {
        if follower == following {
            return Err(DomainError::CannotFollowSelf);
        }
        if !self.tables.lock().follows.insert((follower, following)) {
            return Err(DomainError::AlreadyFollowing);
        }
        Ok(())
    }

    async fn delete(&self, follower: UserId, following: UserId) -> RepoResult<bool> {
        Ok(self.tables.lock().follows.remove(&(follower, following)))
    }
}

// ============================================================================
// Articles, favorites and comments
// ============================================================================

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Article>> {
        Ok(self
            .tables
            .lock()
            .content
            .articles
            .values()
            .find(|a| a.slug == slug)
            .cloned())
    }

    async fn list(&self, query: ArticleQuery) -> RepoResult<ArticlePage> {
        let tables = self.tables.lock();

        // An unknown username matches nothing, like the SQL subquery
        let author = query.author.as_deref().map(|name| tables.user_id_by_name(name));
        let favorited_by = query
            .favorited_by
            .as_deref()
            .map(|name| tables.user_id_by_name(name));

        let mut matching: Vec<&Article> = tables
            .content
            .articles
            .values()
            .filter(|a| !a.is_draft)
            .filter(|a| match &query.tag {
                Some(tag) => a.tag_list.to_column().contains(tag.as_str()),
                None => true,
            })
            .filter(|a| match author {
                Some(id) => id == Some(a.author_id),
                None => true,
            })
            .filter(|a| match favorited_by {
                Some(Some(user)) => tables.content.favorites.contains(&(user, a.id)),
                Some(None) => false,
                None => true,
            })
            .filter(|a| match query.followed_by {
                Some(follower) => tables.follows.contains(&(follower, a.author_id)),
                None => true,
            })
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let articles = matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(ArticlePage { articles, total })
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn exists(&self, user: UserId, article: ArticleId) -> RepoResult<bool> {
        Ok(self
            .tables
            .lock()
            .content
            .favorites
            .contains(&(user, article)))
    }

    async fn favorited_among(
        &self,
        user: UserId,
        articles: &[ArticleId],
    ) -> RepoResult<HashSet<ArticleId>> {
        let tables = self.tables.lock();
        Ok(articles
            .iter()
            .copied()
            .filter(|a| tables.content.favorites.contains(&(user, *a)))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        Ok(self.tables.lock().content.comments.get(&id).cloned())
    }

    async fn find_by_article(&self, article_id: ArticleId) -> RepoResult<Vec<Comment>> {
        let tables = self.tables.lock();
        let mut comments: Vec<Comment> = tables
            .content
            .comments
            .values()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn create(&self, comment: NewComment) -> RepoResult<Comment> {
        let mut tables = self.tables.lock();
        if !tables.content.articles.contains_key(&comment.article_id) {
            return Err(DomainError::ArticleNotFound(comment.article_id.to_string()));
        }
        let id = CommentId::new(tables.allocate_id());
        let created = Comment {
            id,
            body: comment.body,
            article_id: comment.article_id,
            author_id: comment.author_id,
            created_at: comment.created_at,
            updated_at: comment.created_at,
        };
        tables.content.comments.insert(id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: CommentId) -> RepoResult<()> {
        self.tables
            .lock()
            .content
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::CommentNotFound(id))
    }
}

// ============================================================================
// Unit of work
// ============================================================================

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        let base = self.tables.lock().content.clone();
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            working: base.clone(),
            base,
        }))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

/// A private copy of the content tables; its changes are applied on commit
pub struct MemoryTransaction {
    store: MemoryStore,
    base: ContentTables,
    working: ContentTables,
}

impl MemoryTransaction {
    fn allocate_id(&self) -> i64 {
        self.store.tables.lock().allocate_id()
    }

    fn slug_taken(&self, slug: &str, except: Option<ArticleId>) -> bool {
        self.working
            .articles
            .values()
            .any(|a| a.slug == slug && Some(a.id) != except)
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn insert_article(&mut self, article: NewArticle) -> RepoResult<Article> {
        if self.slug_taken(&article.slug, None) {
            return Err(DomainError::SlugTaken);
        }
        let id = ArticleId::new(self.allocate_id());
        let created = Article {
            id,
            slug: article.slug,
            title: article.title,
            description: article.description,
            body: article.body,
            tag_list: article.tag_list,
            author_id: article.author_id,
            favorites_count: 0,
            is_draft: article.is_draft,
            created_at: article.created_at,
            updated_at: article.created_at,
        };
        self.working.articles.insert(id, created.clone());
        Ok(created)
    }

    async fn update_article(&mut self, article: &Article) -> RepoResult<()> {
        if self.slug_taken(&article.slug, Some(article.id)) {
            return Err(DomainError::SlugTaken);
        }
        let stored = self
            .working
            .articles
            .get_mut(&article.id)
            .ok_or_else(|| DomainError::ArticleNotFound(article.slug.clone()))?;
        let favorites_count = stored.favorites_count;
        *stored = Article {
            favorites_count,
            ..article.clone()
        };
        Ok(())
    }

    async fn delete_article(&mut self, id: ArticleId) -> RepoResult<()> {
        self.working
            .articles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::ArticleNotFound(id.to_string()))
    }

    async fn find_tag_by_name(&mut self, name: &str) -> RepoResult<Option<Tag>> {
        Ok(self
            .working
            .tags
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn insert_tag(&mut self, name: &str, slug: &str) -> RepoResult<Tag> {
        if self.working.tags.values().any(|t| t.name == name) {
            return Err(DomainError::TagRelation(format!(
                "tag '{name}' was created concurrently"
            )));
        }
        let tag = Tag {
            id: TagId::new(self.allocate_id()),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        self.working.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn link_tag(&mut self, article_id: ArticleId, tag_id: TagId) -> RepoResult<()> {
        if self.store.fail_next_tag_link.swap(false, Ordering::SeqCst) {
            return Err(DomainError::TagRelation(format!(
                "article_tags ({article_id}, {tag_id}) violates foreign key constraint"
            )));
        }
        if !self.working.articles.contains_key(&article_id)
            || !self.working.tags.contains_key(&tag_id)
        {
            return Err(DomainError::TagRelation(format!(
                "cannot link tag {tag_id} to article {article_id}"
            )));
        }
        if !self.working.article_tags.insert((article_id, tag_id)) {
            return Err(DomainError::TagRelation(format!(
                "tag {tag_id} already linked to article {article_id}"
            )));
        }
        Ok(())
    }

    async fn unlink_tags(&mut self, article_id: ArticleId) -> RepoResult<u64> {
        let before = self.working.article_tags.len();
        self.working.article_tags.retain(|(a, _)| *a != article_id);
        Ok((before - self.working.article_tags.len()) as u64)
    }

    async fn insert_favorite(&mut self, user: UserId, article: ArticleId) -> RepoResult<()> {
        if !self.working.favorites.insert((user, article)) {
            return Err(DomainError::AlreadyFavorited);
        }
        Ok(())
    }

    async fn delete_favorite(&mut self, user: UserId, article: ArticleId) -> RepoResult<bool> {
        Ok(self.working.favorites.remove(&(user, article)))
    }

    async fn delete_favorites(&mut self, article_id: ArticleId) -> RepoResult<u64> {
        let before = self.working.favorites.len();
        self.working.favorites.retain(|(_, a)| *a != article_id);
        Ok((before - self.working.favorites.len()) as u64)
    }

    async fn delete_comments(&mut self, article_id: ArticleId) -> RepoResult<u64> {
        let before = self.working.comments.len();
        self.working.comments.retain(|_, c| c.article_id != article_id);
        Ok((before - self.working.comments.len()) as u64)
    }

    async fn adjust_favorites_count(
        &mut self,
        article_id: ArticleId,
        delta: i64,
    ) -> RepoResult<i64> {
        let article = self
            .working
            .articles
            .get_mut(&article_id)
            .ok_or_else(|| DomainError::ArticleNotFound(article_id.to_string()))?;
        article.favorites_count = (article.favorites_count + delta).max(0);
        Ok(article.favorites_count)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryTransaction {
            store,
            base,
            working,
        } = *self;
        if store.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("commit failed".to_string()));
        }
        store.tables.lock().content.apply(&base, working);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::TagList;

    fn new_article(slug: &str) -> NewArticle {
        NewArticle {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            body: "body".to_string(),
            tag_list: TagList::default(),
            author_id: UserId::new(1),
            is_draft: false,
            created_at: Utc::now(),
        }
    }

    fn new_comment(article_id: ArticleId) -> NewComment {
        NewComment {
            body: "first".to_string(),
            article_id,
            author_id: UserId::new(2),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_commit_keeps_rows_written_outside_the_transaction() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let article = tx.insert_article(new_article("kept")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.insert_favorite(UserId::new(2), article.id).await.unwrap();
        tx.adjust_favorites_count(article.id, 1).await.unwrap();

        CommentRepository::create(&store, new_comment(article.id))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.comment_rows(article.id), 1);
        assert_eq!(store.favorite_rows(article.id), 1);
        let stored = ArticleRepository::find_by_slug(&store, "kept")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.favorites_count, 1);
    }

    #[tokio::test]
    async fn test_commit_applies_deletes() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let article = tx.insert_article(new_article("gone")).await.unwrap();
        tx.commit().await.unwrap();
        CommentRepository::create(&store, new_comment(article.id))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.delete_comments(article.id).await.unwrap();
        tx.delete_article(article.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.comment_rows(article.id), 0);
        assert!(store.slugs().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_transaction_writes_nothing() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_article(new_article("draft")).await.unwrap();
        drop(tx);

        assert!(store.slugs().is_empty());
    }
}
