//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, Unchanged,
};

use yatube_core::domain::{
    Comment, Follow, Group, GroupId, NewComment, NewGroup, NewPost, Post, PostId, User, UserId,
};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostFilter, PostRepository,
    UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: User) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(new_user)
            .insert(self.db())
            .await
            .map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .filter(user::Column::Id.eq(id))
            .exec(self.db())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create(&self, new_group: NewGroup) -> Result<Group, RepoError> {
        let model = group::ActiveModel {
            id: NotSet,
            title: Set(new_group.title),
            slug: Set(new_group.slug),
            description: Set(new_group.description),
        }
        .insert(self.db())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Id.is_in(ids.iter().copied()))
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .order_by_asc(group::Column::Id)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

fn post_condition(filter: &PostFilter) -> Condition {
    match filter {
        PostFilter::All => Condition::all(),
        PostFilter::Group(id) => Condition::all().add(post::Column::GroupId.eq(*id)),
        PostFilter::Author(id) => Condition::all().add(post::Column::AuthorId.eq(*id)),
        PostFilter::Authors(ids) => {
            Condition::all().add(post::Column::AuthorId.is_in(ids.iter().copied()))
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            text: Set(new_post.text),
            pub_date: Set(new_post.pub_date.into()),
            author_id: Set(new_post.author_id),
            group_id: Set(new_post.group_id),
            image: Set(new_post.image),
        }
        .insert(self.db())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, changed: &Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Unchanged(changed.id),
            text: Set(changed.text.clone()),
            group_id: Set(changed.group_id),
            image: Set(changed.image.clone()),
            ..Default::default()
        }
        .update(self.db())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post_condition(filter))
            .count(self.db())
            .await
            .map_err(map_db_err)
    }

    async fn fetch(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post_condition(filter))
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new_comment.post_id),
            author_id: Set(new_comment.author_id),
            text: Set(new_comment.text),
            created: Set(new_comment.created.into()),
        }
        .insert(self.db())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create(&self, user_id: UserId, author_id: UserId) -> Result<Follow, RepoError> {
        let model = follow::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            author_id: Set(author_id),
        }
        .insert(self.db())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find(&self, user_id: UserId, author_id: UserId) -> Result<Option<Follow>, RepoError> {
        let result = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .one(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn delete_pair(&self, user_id: UserId, author_id: UserId) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn followed_authors(&self, user_id: UserId) -> Result<Vec<UserId>, RepoError> {
        let result = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(|f| f.author_id).collect())
    }
}
