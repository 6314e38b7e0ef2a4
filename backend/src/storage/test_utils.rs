//! Seeding helpers for tests.
//!
//! The recap engine only reads students, mentors, attendance and SPP payments,
//! so tests populate those tables directly.

use crate::storage::connection::DbConnection;

pub async fn insert_user(db: &DbConnection, username: &str, full_name: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, full_name) VALUES (?, ?)")
        .bind(username)
        .bind(full_name)
        .execute(db.pool())
        .await
        .expect("Failed to insert user")
        .last_insert_rowid()
}

pub async fn insert_transaction(db: &DbConnection, date: &str, entry_type: &str, category: &str, amount: i64) -> i64 {
    sqlx::query(
        "INSERT INTO financial_transactions (date, type, category, description, amount) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(date)
    .bind(entry_type)
    .bind(category)
    .bind(format!("{} {}", category, date))
    .bind(amount)
    .execute(db.pool())
    .await
    .expect("Failed to insert transaction")
    .last_insert_rowid()
}

pub async fn insert_student(
    db: &DbConnection,
    name: &str,
    level: &str,
    monthly_fee: i64,
    status: &str,
    enrollment_date: &str,
) -> i64 {
    sqlx::query(
        "INSERT INTO students (name, level, monthly_fee, status, enrollment_date) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(level)
    .bind(monthly_fee)
    .bind(status)
    .bind(enrollment_date)
    .execute(db.pool())
    .await
    .expect("Failed to insert student")
    .last_insert_rowid()
}

pub async fn insert_mentor(db: &DbConnection, name: &str, status: &str, join_date: &str) -> i64 {
    sqlx::query("INSERT INTO mentors (name, status, join_date) VALUES (?, ?, ?)")
        .bind(name)
        .bind(status)
        .bind(join_date)
        .execute(db.pool())
        .await
        .expect("Failed to insert mentor")
        .last_insert_rowid()
}

pub async fn insert_spp_payment(db: &DbConnection, student_id: i64, month: u32, year: i32, amount: i64, payment_date: &str) {
    sqlx::query(
        "INSERT INTO spp_payments (student_id, month, year, amount, payment_date) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(student_id)
    .bind(month as i64)
    .bind(year as i64)
    .bind(amount)
    .bind(payment_date)
    .execute(db.pool())
    .await
    .expect("Failed to insert SPP payment");
}

pub async fn insert_student_attendance(db: &DbConnection, student_id: i64, date: &str, status: &str) {
    sqlx::query("INSERT INTO student_attendance (student_id, date, status) VALUES (?, ?, ?)")
        .bind(student_id)
        .bind(date)
        .bind(status)
        .execute(db.pool())
        .await
        .expect("Failed to insert student attendance");
}

pub async fn insert_mentor_attendance(db: &DbConnection, mentor_id: i64, date: &str, status: &str) {
    sqlx::query("INSERT INTO mentor_attendance (mentor_id, date, status) VALUES (?, ?, ?)")
        .bind(mentor_id)
        .bind(date)
        .bind(status)
        .execute(db.pool())
        .await
        .expect("Failed to insert mentor attendance");
}
