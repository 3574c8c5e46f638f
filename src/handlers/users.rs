//! User account HTTP handlers.
//!
//! This module implements the user-related API endpoints:
//! - POST /api/users/login - Check a username/password pair
//! - POST /api/users/register - Create an account
//! - GET /api/users/profile/{username} - Profile with orders and pets
//! - PUT /api/users/profile/{username} - Update profile fields
//!
//! Passwords are stored salted and hashed, see [`crate::services::password`].

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use sqlx::error::DatabaseError;

use crate::{
    db::{
        DbPool,
        query::{self, SqlQuery},
    },
    error::AppError,
    extract::{JsonBody, PathParam},
    models::user::{
        LoginRequest, LoginResponse, MessageResponse, ProfileResponse, ProfileUpdateRequest,
        ProfileUpdatedResponse, RegisterRequest, User,
    },
    services::password,
};

/// Check a username/password pair.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "message": "Login successful", "username": "demo" }`
/// - **Error (400)**: Missing credentials
/// - **Error (401)**: Invalid credentials (unknown user or wrong password)
pub async fn login(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(username), Some(candidate)) = (
        super::non_empty(request.username),
        super::non_empty(request.password),
    ) else {
        return Err(AppError::invalid("Missing credentials"));
    };

    let stored: Option<String> =
        sqlx::query_scalar("SELECT password FROM users WHERE username = $1")
            .bind(&username)
            .fetch_optional(&pool)
            .await?;

    // Unknown users and wrong passwords are indistinguishable to the caller
    let Some(stored) = stored else {
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify(candidate, stored).await? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("User {} logged in", username);
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username,
    }))
}

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// { "username": "newbie", "password": "s3cret", "email": "newbie@example.com" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{ "message": "Registration successful" }`
/// - **Error (400)**: Missing required fields, Username already exists, or
///   the email belongs to another account
pub async fn register(
    State(pool): State<DbPool>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let (Some(username), Some(plain), Some(email)) = (
        super::non_empty(request.username),
        super::non_empty(request.password),
        super::non_empty(request.email),
    ) else {
        return Err(AppError::invalid("Missing required fields"));
    };

    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(&username)
        .fetch_one(&pool)
        .await?;

    if taken {
        return Err(AppError::invalid("Username already exists"));
    }

    let insert = SqlQuery::new("INSERT INTO users (username, password, email) VALUES ($1, $2, $3)")
        .bind(username.as_str())
        .bind(password::hash(plain).await?)
        .bind(email);

    // The primary key still guards a concurrent registration of the same name
    match query::execute(&pool, &insert).await {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::invalid("Username or email already exists"));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Registered user {}", username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Get a user's profile with order summaries and adopted pets.
///
/// # Response
///
/// - **Success (200 OK)**: profile fields plus `orders` and `pets` arrays
/// - **Error (404)**: User not found
///
/// ```json
/// {
///   "username": "demo",
///   "email": "demo@happytails.example",
///   "name": "Demo User",
///   "phone": null,
///   "address": null,
///   "city": "Springfield",
///   "state": "IL",
///   "orders": [
///     { "orderid": 3, "orderdate": "...", "status": "Pending", "item_count": 2, "total_amount": 64.77 }
///   ],
///   "pets": [
///     { "petid": 5, "pet_type": "Dog", "gender": "Female", "age": 2, "breed": "Labrador" }
///   ]
/// }
/// ```
pub async fn get_profile(
    State(pool): State<DbPool>,
    PathParam(username): PathParam<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT username, password, email, name, phone, address, city, state
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(&username)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found"))?;

    let orders = SqlQuery::new(
        r#"
        SELECT o.order_id AS orderid, o.order_date AS orderdate, o.status AS status,
               COUNT(od.product_id) AS item_count,
               SUM(p.price * od.quantity)::float8 AS total_amount
        FROM orders o
        JOIN order_details od ON o.order_id = od.order_id
        JOIN product p ON od.product_id = p.product_id
        WHERE o.username = $1
        GROUP BY o.order_id, o.order_date, o.status
        ORDER BY o.order_date DESC, o.order_id DESC
        "#,
    )
    .bind(username.as_str());

    let pets = SqlQuery::new(
        r#"
        SELECT p.pet_id AS petid, pt.pet_type_name AS pet_type, p.gender AS gender,
               p.age AS age, b.breed_name AS breed
        FROM pet p
        JOIN pet_type pt ON p.pet_type_id = pt.pet_type_id
        JOIN breed b ON p.breed_id = b.breed_id
        WHERE p.owner = $1
        ORDER BY p.pet_id
        "#,
    )
    .bind(username.as_str());

    let orders = query::fetch_records(&pool, &orders).await?;
    let pets = query::fetch_records(&pool, &pets).await?;

    Ok(Json(ProfileResponse::new(user, orders, pets)))
}

/// Assemble the profile UPDATE, including the password only when one is given.
async fn profile_update(
    username: &str,
    request: ProfileUpdateRequest,
) -> Result<SqlQuery, AppError> {
    let (Some(name), Some(email), Some(phone), Some(city)) = (
        super::non_empty(request.name),
        super::non_empty(request.email),
        super::non_empty(request.phone),
        super::non_empty(request.city),
    ) else {
        return Err(AppError::invalid("Required fields missing"));
    };

    let new_password = super::non_empty(request.password);
    let sql = if new_password.is_some() {
        "UPDATE users SET name = $1, email = $2, phone = $3, address = $4, city = $5, state = $6, password = $7"
    } else {
        "UPDATE users SET name = $1, email = $2, phone = $3, address = $4, city = $5, state = $6"
    };

    let mut update = SqlQuery::new(sql)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(request.address)
        .bind(city)
        .bind(request.state);

    if let Some(plain) = new_password {
        update = update.bind(password::hash(plain).await?);
    }

    update.filter("username = ?", username);
    Ok(update)
}

/// Update a user's profile.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Demo User",
///   "email": "demo@happytails.example",
///   "phone": "555-0199",
///   "address": "1 Elm St",
///   "city": "Springfield",
///   "state": "IL",
///   "password": "optional-new-password"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "success": true, "username": "demo" }`
/// - **Error (400)**: Required fields missing, or the email/phone belongs to another user
/// - **Error (404)**: User not found
pub async fn update_profile(
    State(pool): State<DbPool>,
    PathParam(username): PathParam<String>,
    JsonBody(request): JsonBody<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let conflict_check = (request.email.clone(), request.phone.clone());
    let update = profile_update(&username, request).await?;

    let in_use: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
            WHERE (email = $1 OR phone = $2) AND username <> $3
        )
        "#,
    )
    .bind(conflict_check.0)
    .bind(conflict_check.1)
    .bind(&username)
    .fetch_one(&pool)
    .await?;

    if in_use {
        return Err(AppError::invalid("Email or phone already in use by another user"));
    }

    let updated = match query::execute(&pool, &update).await {
        Ok(rows) => rows,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::invalid("Email or phone already in use by another user"));
        }
        Err(e) => return Err(e.into()),
    };

    if updated == 0 {
        return Err(AppError::NotFound("User not found"));
    }

    tracing::info!("Profile updated for {}", username);

    Ok(Json(ProfileUpdatedResponse {
        success: true,
        username,
    }))
}
