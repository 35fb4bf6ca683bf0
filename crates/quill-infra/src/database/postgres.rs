//! PostgreSQL store implementations.
//!
//! Relational integrity (foreign keys, cascade deletes, unique columns) is
//! enforced by the schema; constraint breaches surface as
//! `StoreError::Integrity`. The post listing translates the core's
//! `PostFilter` semantics into SQL conditions and stays duplicate-free via
//! `DISTINCT` over the post columns.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, ExprTrait, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, JoinType, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag, User};
use quill_core::error::StoreError;
use quill_core::ports::{CommentStore, PostStore, TagStore, UserStore};
use quill_core::query::{Page, PostFilter};

use super::entity::{comment, post, post_tag, tag, user};

fn map_db_err(e: DbErr) -> StoreError {
    let msg = e.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        StoreError::Integrity("Duplicate value for a unique column".to_string())
    } else if msg.contains("foreign key") || msg.contains("violates") {
        StoreError::Integrity(msg)
    } else {
        StoreError::Backend(msg)
    }
}

/// Rebuild a domain post from its row and tag rows. The category column is
/// free text at the SQL level; an unknown value is a backend fault, not a
/// caller error.
fn post_from_row(row: post::Model, tags: Vec<tag::Model>) -> Result<Post, StoreError> {
    let category = row
        .category
        .parse()
        .map_err(|_| StoreError::Backend(format!("Corrupt category column: {}", row.category)))?;

    Ok(Post {
        id: row.id,
        title: row.title,
        slug: row.slug,
        body: row.body,
        category,
        author_id: row.author_id,
        tags: tags.into_iter().map(Into::into).collect(),
        created_at: row.created_at.into(),
        updated_at: row.updated_at.into(),
    })
}

/// PostgreSQL user store.
pub struct PostgresUserStore {
    db: DbConn,
}

impl PostgresUserStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, entity: User) -> Result<User, StoreError> {
        let model: user::ActiveModel = entity.into();
        let row = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(row.into())
    }

    async fn update(&self, entity: User) -> Result<User, StoreError> {
        let model: user::ActiveModel = entity.into();
        let row = model.update(&self.db).await.map_err(map_db_err)?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        // Posts and comments go with the user via ON DELETE CASCADE.
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL tag store.
pub struct PostgresTagStore {
    db: DbConn,
}

impl PostgresTagStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagStore for PostgresTagStore {
    async fn list(&self, page: &Page) -> Result<Vec<Tag>, StoreError> {
        let rows = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        // Duplicate names are legitimate; take the first row deterministically.
        let row = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .order_by_asc(tag::Column::Id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, entity: Tag) -> Result<Tag, StoreError> {
        let model: tag::ActiveModel = entity.into();
        let row = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(row.into())
    }
}

/// PostgreSQL post store.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn filter_condition(filter: &PostFilter) -> Condition {
        let mut cond = Condition::all();

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            cond = cond.add(
                Condition::any()
                    .add(Expr::col((post::Entity, post::Column::Title)).ilike(pattern.clone()))
                    .add(Expr::col((post::Entity, post::Column::Body)).ilike(pattern.clone()))
                    .add(Expr::col((user::Entity, user::Column::Username)).ilike(pattern)),
            );
        }

        if let Some(category) = filter.category {
            cond = cond.add(post::Column::Category.eq(category.as_str()));
        }

        if let Some(ids) = &filter.tags {
            cond = cond.add(post_tag::Column::TagId.is_in(ids.clone()));
        }

        if let Some(names) = &filter.tag_names {
            cond = cond.add(tag::Column::Name.is_in(names.clone()));
        }

        if let Some(author) = &filter.author {
            cond = cond
                .add(Expr::col((user::Entity, user::Column::Username)).ilike(format!("%{author}%")));
        }

        if let Some(after) = filter.created_after {
            cond = cond.add(post::Column::CreatedAt.gte(after));
        }

        if let Some(before) = filter.created_before {
            cond = cond.add(post::Column::CreatedAt.lte(before));
        }

        if let Some(has_tags) = filter.has_tags {
            let tagged = Query::select()
                .column(post_tag::Column::PostId)
                .from(post_tag::Entity)
                .and_where(
                    Expr::col((post_tag::Entity, post_tag::Column::PostId))
                        .equals((post::Entity, post::Column::Id)),
                )
                .to_owned();
            let exists = Expr::exists(tagged);
            cond = cond.add(if has_tags { exists } else { exists.not() });
        }

        cond
    }

    async fn attach_tags(&self, rows: Vec<post::Model>) -> Result<Vec<Post>, StoreError> {
        let tag_rows = rows
            .load_many_to_many(tag::Entity, post_tag::Entity, &self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .zip(tag_rows)
            .map(|(row, tags)| post_from_row(row, tags))
            .collect()
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn list(&self, filter: &PostFilter, page: &Page) -> Result<Vec<Post>, StoreError> {
        let mut query = post::Entity::find();

        if filter.search.is_some() || filter.author.is_some() {
            query = query.join(JoinType::InnerJoin, post::Relation::Author.def());
        }
        if filter.tags.is_some() || filter.tag_names.is_some() {
            query = query
                .join(JoinType::LeftJoin, post::Relation::PostTags.def())
                .join(JoinType::LeftJoin, post_tag::Relation::Tag.def());
        }

        // DISTINCT over the post columns keeps the tag join from duplicating
        // posts that match more than one tag; the page window applies to the
        // deduplicated, ordered rows.
        let rows = query
            .filter(Self::filter_condition(filter))
            .distinct()
            .order_by_desc(post::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.attach_tags(rows).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let row = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => {
                let tags = row
                    .find_related(tag::Entity)
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;
                Ok(Some(post_from_row(row, tags)?))
            }
            None => Ok(None),
        }
    }

    async fn slugs(&self) -> Result<HashSet<String>, StoreError> {
        let slugs: Vec<String> = post::Entity::find()
            .select_only()
            .column(post::Column::Slug)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(slugs.into_iter().collect())
    }

    async fn insert(&self, entity: Post) -> Result<Post, StoreError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let tags = entity.tags.clone();
        let model: post::ActiveModel = entity.into();
        let row = model.insert(&txn).await.map_err(map_db_err)?;

        if !tags.is_empty() {
            let links = tags.iter().map(|t| post_tag::ActiveModel {
                post_id: sea_orm::Set(row.id),
                tag_id: sea_orm::Set(t.id),
            });
            post_tag::Entity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        post_from_row(row, Vec::new()).map(|mut post| {
            post.tags = tags;
            post
        })
    }

    async fn update(&self, entity: Post) -> Result<Post, StoreError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let tags = entity.tags.clone();
        let model: post::ActiveModel = entity.into();
        let row = model.update(&txn).await.map_err(map_db_err)?;

        // Replace the tag relation wholesale; detached tags survive.
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(row.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if !tags.is_empty() {
            let links = tags.iter().map(|t| post_tag::ActiveModel {
                post_id: sea_orm::Set(row.id),
                tag_id: sea_orm::Set(t.id),
            });
            post_tag::Entity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        post_from_row(row, Vec::new()).map(|mut post| {
            post.tags = tags;
            post
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        // Comments and relation rows go via ON DELETE CASCADE.
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL comment store.
pub struct PostgresCommentStore {
    db: DbConn,
}

impl PostgresCommentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentStore for PostgresCommentStore {
    async fn list(&self, page: &Page) -> Result<Vec<Comment>, StoreError> {
        let rows = comment::Entity::find()
            .order_by_asc(comment::Column::CreatedAt)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        let row = comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, entity: Comment) -> Result<Comment, StoreError> {
        let model: comment::ActiveModel = entity.into();
        let row = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(row.into())
    }

    async fn update(&self, entity: Comment) -> Result<Comment, StoreError> {
        let model: comment::ActiveModel = entity.into();
        let row = model.update(&self.db).await.map_err(map_db_err)?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
