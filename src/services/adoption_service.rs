//! Adoption service - turns store availability into an owned pet.
//!
//! # Atomicity Guarantees
//!
//! The availability check, the decrement, and the pet/adoption inserts run in
//! one PostgreSQL transaction. The check and decrement are a single conditional
//! `UPDATE`, so two concurrent adoptions of the last animal cannot both succeed:
//! the second one blocks on the row lock and then sees `available = 0`.

use rand::Rng;

use crate::{db::DbPool, error::AppError, models::pet::Pet};

/// Adopt one animal of `breed_id` from `store_id` for `username`.
///
/// # Process
///
/// 1. Verify the user exists
/// 2. Decrement availability if it is above zero (row is locked until commit)
/// 3. Create the pet with a random gender and an age of 1-5 years
/// 4. Record the adoption
/// 5. Commit (or rollback on error)
///
/// # Errors
///
/// - `NotFound`: user does not exist
/// - `InvalidRequest`: no availability row for the breed/store pair, or it is zero
/// - `Database`: any database failure; nothing is persisted
pub async fn adopt(
    pool: &DbPool,
    username: &str,
    breed_id: i32,
    store_id: i32,
) -> Result<Pet, AppError> {
    let mut tx = pool.begin().await?;

    let user_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&mut *tx)
            .await?;

    if !user_exists {
        tx.rollback().await?;
        return Err(AppError::NotFound("User not found"));
    }

    let remaining: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE availability
        SET available = available - 1
        WHERE breed_id = $1 AND store_id = $2 AND available > 0
        RETURNING available
        "#,
    )
    .bind(breed_id)
    .bind(store_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(remaining) = remaining else {
        tx.rollback().await?;
        return Err(AppError::invalid("Pet not available at this store"));
    };

    let (gender, age) = random_traits();

    // Pet type comes from the breed row
    let pet = sqlx::query_as::<_, Pet>(
        r#"
        INSERT INTO pet (pet_type_id, gender, age, breed_id, owner)
        SELECT b.pet_type_id, $1, $2, b.breed_id, $3
        FROM breed b
        WHERE b.breed_id = $4
        RETURNING pet_id, pet_type_id, gender, age, breed_id, owner
        "#,
    )
    .bind(gender)
    .bind(age)
    .bind(username)
    .bind(breed_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO adoption (username, pet_id) VALUES ($1, $2)")
        .bind(username)
        .bind(pet.pet_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        pet_id = pet.pet_id,
        breed_id,
        store_id,
        remaining,
        "Pet adopted by {}",
        username
    );

    Ok(pet)
}

/// Random gender and an age between 1 and 5 years.
fn random_traits() -> (&'static str, i32) {
    let mut rng = rand::rng();
    let gender = if rng.random_bool(0.5) { "Male" } else { "Female" };
    (gender, rng.random_range(1..=5))
}
