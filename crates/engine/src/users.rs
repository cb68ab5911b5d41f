//! Users table and the plain record handed out by the engine.

use std::str::FromStr;

use sea_orm::entity::prelude::*;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub class: String,
    pub nationality: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A persisted user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub class: String,
    pub nationality: String,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            class: model.class,
            nationality: model.nationality,
        }
    }
}

/// The mutable fields of a user, written together on create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub class: String,
    pub nationality: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        class: impl Into<String>,
        nationality: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            nationality: nationality.into(),
        }
    }
}

/// Columns a user can be looked up by.
///
/// Field names coming from outside are parsed into this enum, so only real
/// column identifiers ever reach a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserField {
    Id,
    Name,
    Class,
    Nationality,
}

impl UserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Name => "name",
            UserField::Class => "class",
            UserField::Nationality => "nationality",
        }
    }

    pub(crate) fn column(&self) -> Column {
        match self {
            UserField::Id => Column::Id,
            UserField::Name => Column::Name,
            UserField::Class => Column::Class,
            UserField::Nationality => Column::Nationality,
        }
    }
}

impl FromStr for UserField {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" => Ok(UserField::Id),
            "name" => Ok(UserField::Name),
            "class" => Ok(UserField::Class),
            "nationality" => Ok(UserField::Nationality),
            other => Err(EngineError::InvalidField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_fields() {
        for field in [
            UserField::Id,
            UserField::Name,
            UserField::Class,
            UserField::Nationality,
        ] {
            assert_eq!(field.as_str().parse::<UserField>().unwrap(), field);
        }
    }

    #[test]
    #[should_panic(expected = "InvalidField(\"password\")")]
    fn reject_unknown_field() {
        "password".parse::<UserField>().unwrap();
    }

    #[test]
    fn reject_injected_identifier() {
        let err = "name` = '' OR 1=1 --".parse::<UserField>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidField(_)));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        assert!("Name".parse::<UserField>().is_err());
    }
}
