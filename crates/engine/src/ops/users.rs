use sea_orm::{ActiveValue, QueryFilter, prelude::*, sea_query::Expr};

use crate::{EngineError, NewUser, ResultEngine, User, UserField, users};

use super::{Engine, db_error};

impl Engine {
    /// List every user, in whatever order the database returns them.
    pub async fn list_users(&self) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .all(&self.database)
            .await
            .map_err(db_error("list_users"))?;

        Ok(models.into_iter().map(User::from).collect())
    }

    /// Get a user by id. `None` when no row matches.
    pub async fn user(&self, id: i32) -> ResultEngine<Option<User>> {
        let model = users::Entity::find_by_id(id)
            .one(&self.database)
            .await
            .map_err(db_error("user"))?;

        Ok(model.map(User::from))
    }

    /// Insert a new user and return it with the id assigned by the database.
    ///
    /// The name is stored as given; callers validate it.
    pub async fn create_user(&self, user: NewUser) -> ResultEngine<User> {
        let model = users::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(user.name),
            class: ActiveValue::Set(user.class),
            nationality: ActiveValue::Set(user.nationality),
        }
        .insert(&self.database)
        .await
        .map_err(db_error("create_user"))?;

        Ok(model.into())
    }

    /// Overwrite name, class and nationality of an existing user.
    ///
    /// Returns `None` when no user has `id`; no row is ever inserted.
    pub async fn update_user(&self, id: i32, user: NewUser) -> ResultEngine<Option<User>> {
        users::Entity::update_many()
            .col_expr(users::Column::Name, Expr::value(user.name))
            .col_expr(users::Column::Class, Expr::value(user.class))
            .col_expr(users::Column::Nationality, Expr::value(user.nationality))
            .filter(users::Column::Id.eq(id))
            .exec(&self.database)
            .await
            .map_err(db_error("update_user"))?;

        // MySQL reports zero affected rows when the values are unchanged, so
        // existence is decided by reading the row back.
        self.user(id).await
    }

    /// Delete a user. Returns whether a row was removed.
    pub async fn delete_user(&self, id: i32) -> ResultEngine<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.database)
            .await
            .map_err(db_error("delete_user"))?;

        Ok(result.rows_affected > 0)
    }

    /// Find users whose `field` equals `value`.
    pub async fn find_users_by(
        &self,
        field: UserField,
        value: &str,
    ) -> ResultEngine<Vec<User>> {
        let bound: Value = match field {
            UserField::Id => value
                .trim()
                .parse::<i32>()
                .map_err(|_| {
                    EngineError::InvalidValue(format!("{} must be an integer", field.as_str()))
                })?
                .into(),
            UserField::Name | UserField::Class | UserField::Nationality => value.into(),
        };

        let models = users::Entity::find()
            .filter(field.column().eq(bound))
            .all(&self.database)
            .await
            .map_err(db_error("find_users_by"))?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
