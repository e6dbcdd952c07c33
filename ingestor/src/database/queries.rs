use crate::models::{CanonicalFacility, InfectionStatus};
use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub async fn get_prior_cumulative<'e, E>(
    executor: E,
    date: NaiveDate,
    prefecture: &str,
) -> Result<Option<i64>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    // Duplicate rows are possible after a rerun, so pin the pick to the newest
    sqlx::query_scalar::<_, i64>(
        r"
        SELECT infection_number_cumulatively
        FROM infection_status
        WHERE date = $1 AND prefecture = $2
        ORDER BY created_at DESC
        LIMIT 1
        ",
    )
    .bind(date)
    .bind(prefecture)
    .fetch_optional(executor)
    .await
    .map_err(QueryError::from)
}

pub async fn insert_infection_status<'e, E>(
    executor: E,
    status: &InfectionStatus,
) -> Result<u64, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r"
        INSERT INTO infection_status (
            id,
            date,
            prefecture,
            infection_number_daily,
            infection_number_cumulatively
        )
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(Uuid::now_v7())
    .bind(status.date)
    .bind(&status.region)
    .bind(status.daily_delta)
    .bind(status.cumulative_total)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_facility<'e, E>(
    executor: E,
    facility: &CanonicalFacility,
) -> Result<u64, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let details = &facility.details;
    let result = sqlx::query(
        r"
        INSERT INTO facility (
            id,
            facility_id,
            facility_name,
            zipcode,
            pref_name,
            facility_addr,
            facility_tel,
            latitude,
            longitude,
            submit_date,
            local_gov_code,
            city_name,
            facility_code,
            hospitalization,
            outpatient,
            emergency
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ",
    )
    .bind(Uuid::now_v7())
    .bind(&facility.facility_id)
    .bind(&details.name)
    .bind(&details.zip_code)
    .bind(&details.prefecture)
    .bind(&details.address)
    .bind(&details.tel)
    .bind(&details.latitude)
    .bind(&details.longitude)
    .bind(&details.submit_date)
    .bind(&details.local_gov_code)
    .bind(&details.city_name)
    .bind(&details.facility_code)
    // An unanswered service type is stored as an empty string
    .bind(facility.hospitalization.as_deref().unwrap_or_default())
    .bind(facility.outpatient.as_deref().unwrap_or_default())
    .bind(facility.emergency.as_deref().unwrap_or_default())
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
