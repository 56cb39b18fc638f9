use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::db_err;
use crate::domain::user::{CreateUserDto, GetUserDto, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;
use crate::shared::{DomainError, DomainResult, PaginatedResult};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: &str) -> DomainResult<Option<user::Model>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Customer => UserRole::Customer,
        user::UserRole::Technician => UserRole::Technician,
        user::UserRole::Admin => UserRole::Admin,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Customer => user::UserRole::Customer,
        UserRole::Technician => user::UserRole::Technician,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(dto.name),
            email: Set(dto.email),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("User already exists with this email".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.find_model(id).await?.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(search) = dto.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Name.contains(search))
                    .add(user::Column::Email.contains(search)),
            );
        }

        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .offset(dto.page.offset())
            .limit(dto.page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(user_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, dto.page))
    }

    async fn list_active_by_role(&self, role: UserRole) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(domain_role_to_entity(role)))
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn set_active(&self, id: &str, is_active: bool) -> DomainResult<Option<User>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.db).await.map_err(db_err)?;

        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let Some(existing) = self.find_model(id).await? else {
            return Err(DomainError::not_found("User", "id", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        let Some(existing) = self.find_model(id).await? else {
            return Err(DomainError::not_found("User", "id", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.last_login_at = Set(Some(Utc::now()));
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;
    use crate::shared::PageRequest;

    fn dto(name: &str, email: &str, role: UserRole) -> CreateUserDto {
        CreateUserDto {
            name: name.into(),
            email: email.into(),
            password_hash: "hash".into(),
            role,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_by_email() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let created = repo
            .create_user(dto("Alice", "alice@example.com", UserRole::Customer))
            .await
            .unwrap();

        assert!(created.is_active);
        let found = repo.get_user_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create_user(dto("Alice", "alice@example.com", UserRole::Customer))
            .await
            .unwrap();
        let err = repo
            .create_user(dto("Other", "alice@example.com", UserRole::Customer))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn active_by_role_skips_deactivated_users() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let t1 = repo
            .create_user(dto("Tom", "tom@example.com", UserRole::Technician))
            .await
            .unwrap();
        repo.create_user(dto("Tina", "tina@example.com", UserRole::Technician))
            .await
            .unwrap();
        repo.create_user(dto("Carl", "carl@example.com", UserRole::Customer))
            .await
            .unwrap();

        repo.set_active(&t1.id, false).await.unwrap();

        let techs = repo.list_active_by_role(UserRole::Technician).await.unwrap();
        assert_eq!(techs.len(), 1);
        assert_eq!(techs[0].name, "Tina");
    }

    #[tokio::test]
    async fn list_filters_by_search_and_role() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create_user(dto("Alice", "alice@example.com", UserRole::Customer))
            .await
            .unwrap();
        repo.create_user(dto("Bob", "bob@example.com", UserRole::Technician))
            .await
            .unwrap();

        let page = repo
            .list_users(GetUserDto {
                search: Some("ali".into()),
                role: None,
                page: PageRequest::new(None, None, 20),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Alice");

        let page = repo
            .list_users(GetUserDto {
                search: None,
                role: Some(UserRole::Technician),
                page: PageRequest::new(None, None, 20),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Bob");
    }

    #[tokio::test]
    async fn record_login_stamps_last_login() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let user = repo
            .create_user(dto("Alice", "alice@example.com", UserRole::Customer))
            .await
            .unwrap();
        assert!(user.last_login_at.is_none());

        repo.record_login(&user.id).await.unwrap();
        let reloaded = repo.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());
    }

    #[tokio::test]
    async fn set_active_on_unknown_user_is_none() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        assert!(repo.set_active("missing", false).await.unwrap().is_none());
    }
}
