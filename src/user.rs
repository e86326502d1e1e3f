//! Code for creating the users table and fetching users from the database.
//!
//! Users only anchor transactions to an owner here. Checking credentials is
//! left to the authentication layer that issues session cookies.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's unique email address.
    pub email: String,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// The data needed to insert a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's unique email address.
    pub email: String,
    /// A password hash produced by the authentication layer.
    pub password_hash: String,
}

/// Create the users table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUser] if the username or email is already taken,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
        (&new_user.username, &new_user.email, &new_user.password_hash),
    )?;

    let id = UserID::new(connection.last_insert_rowid());
    tracing::debug!("Created user {id}");

    Ok(User {
        id,
        username: new_user.username,
        email: new_user.email,
        password_hash: new_user.password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password_hash FROM users WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], |row| {
            Ok(User {
                id: UserID::new(row.get(0)?),
                username: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
            })
        })
        .map_err(|error| error.into())
}

/// Delete a user and, through the foreign key cascade, all of their transactions.
///
/// Returns `false` if no user has the ID `user_id`.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM users WHERE id = :id",
        &[(":id", &user_id.as_i64())],
    )?;

    Ok(rows_affected > 0)
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM users;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

#[cfg(test)]
pub(crate) fn create_test_user(username: &str, connection: &Connection) -> User {
    create_user(
        NewUser {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: "hunter2".to_owned(),
        },
        connection,
    )
    .expect("Could not create test user")
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        user::{NewUser, UserID, count_users, create_test_user, create_user, get_user_by_id},
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();

        let inserted_user = create_test_user("alice", &db_connection);

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username, "alice");
        assert_eq!(inserted_user.email, "alice@example.com");
    }

    #[test]
    fn insert_user_fails_with_duplicate_username() {
        let db_connection = get_db_connection();
        create_test_user("alice", &db_connection);

        let result = create_user(
            NewUser {
                username: "alice".to_owned(),
                email: "someone.else@example.com".to_owned(),
                password_hash: "hunter3".to_owned(),
            },
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUser));
    }

    #[test]
    fn insert_user_fails_with_duplicate_email() {
        let db_connection = get_db_connection();
        create_test_user("alice", &db_connection);

        let result = create_user(
            NewUser {
                username: "bob".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "hunter3".to_owned(),
            },
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUser));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = create_test_user("alice", &db_connection);

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn returns_correct_count() {
        let db_connection = get_db_connection();

        let count = count_users(&db_connection).expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before insertion, got {count}");

        create_test_user("alice", &db_connection);

        let count = count_users(&db_connection).expect("Could not get user count");
        assert_eq!(1, count, "Want one user after insertion, got {count}");
    }
}
