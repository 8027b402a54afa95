use kernel::database::row::Row;
use kernel::model::{id::UserId, user::User};
use shared::error::AppResult;

pub fn user_from_row(row: &Row) -> AppResult<User> {
    Ok(User {
        id: UserId::new(row.integer("id")?),
        first_name: row.text("first_name")?.into(),
        last_name: row.text("last_name")?.into(),
        email: row.text("email")?.into(),
    })
}
