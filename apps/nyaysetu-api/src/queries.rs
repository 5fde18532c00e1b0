//! Queries shared between handlers
//!
//! Helpers take anything that can hand out a SQLite connection, so the same
//! code runs against the pool or inside an open transaction.

use std::collections::HashMap;

use nyaysetu_core::{like_pattern, CityRef, DirectoryFilter, TOP_LAWYERS_LIMIT};
use sqlx::{Acquire, QueryBuilder, Sqlite, SqliteConnection};

use crate::error::{unique_violation, ApiError};
use crate::models::*;

/// Ordering of a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOrder {
    /// Insertion order, unbounded
    Default,
    /// Best rated first, then most wins, at most [`TOP_LAWYERS_LIMIT`]
    Top,
}

/// Fetch one profile with its service cities.
pub async fn fetch_profile<'c, A>(db: A, id: i64) -> Result<Option<LawyerProfileResponse>, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = db.acquire().await?;
    fetch_profile_on(&mut conn, id).await
}

/// [`fetch_profile`] on a concrete connection.
pub async fn fetch_profile_on(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<LawyerProfileResponse>, ApiError> {
    let sql = format!("SELECT {} FROM lawyer_profiles p WHERE p.id = ?", PROFILE_COLUMNS);
    let profile: Option<DbLawyerProfile> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match profile {
        Some(p) => hydrate(conn, vec![p]).await.map(|mut v| v.pop()),
        None => Ok(None),
    }
}

/// Id of the profile owned by `account_id`, if any.
pub async fn profile_id_for_account<'c, A>(db: A, account_id: i64) -> Result<Option<i64>, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = db.acquire().await?;
    let id = sqlx::query_scalar("SELECT id FROM lawyer_profiles WHERE account_id = ?")
        .bind(account_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

/// Owning account of a profile, or `NotFound`.
pub async fn profile_owner<'c, A>(db: A, id: i64) -> Result<i64, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = db.acquire().await?;
    let owner: Option<i64> = sqlx::query_scalar("SELECT account_id FROM lawyer_profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    owner.ok_or_else(|| ApiError::NotFound("Lawyer profile not found.".to_string()))
}

/// Search the directory.
///
/// Each filter category is an `EXISTS` or column predicate on the profile
/// row, so a profile matching through several cities is returned once.
pub async fn search_profiles<'c, A>(
    db: A,
    filter: &DirectoryFilter,
    order: DirectoryOrder,
) -> Result<Vec<LawyerProfileResponse>, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = db.acquire().await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM lawyer_profiles p JOIN accounts a ON a.id = p.account_id WHERE 1 = 1",
        PROFILE_COLUMNS
    ));

    if let Some(spec) = filter.specialization {
        qb.push(" AND p.specialization = ").push_bind(spec.key());
    }

    match &filter.city {
        Some(CityRef::Id(city_id)) => {
            qb.push(
                " AND EXISTS (SELECT 1 FROM lawyer_service_cities lsc \
                 WHERE lsc.lawyer_id = p.id AND lsc.city_id = ",
            )
            .push_bind(*city_id)
            .push(")");
        }
        Some(CityRef::Name(name)) => {
            qb.push(
                " AND EXISTS (SELECT 1 FROM lawyer_service_cities lsc \
                 JOIN cities c ON c.id = lsc.city_id \
                 WHERE lsc.lawyer_id = p.id AND LOWER(c.name) = LOWER(",
            )
            .push_bind(name.clone())
            .push("))");
        }
        None => {}
    }

    if let Some(min) = filter.min_experience {
        qb.push(" AND p.experience_years >= ").push_bind(min);
    }

    if let Some(q) = &filter.q {
        let pattern = like_pattern(q);
        qb.push(" AND (");
        let columns = [
            "LOWER(a.first_name)",
            "LOWER(a.last_name)",
            "LOWER(COALESCE(p.bio, ''))",
            "LOWER(p.license_number)",
        ];
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\'");
        }
        qb.push(")");
    }

    match order {
        DirectoryOrder::Default => {
            qb.push(" ORDER BY p.id");
        }
        DirectoryOrder::Top => {
            qb.push(" ORDER BY p.rating DESC, p.won_cases DESC, p.id LIMIT ")
                .push_bind(TOP_LAWYERS_LIMIT);
        }
    }

    let profiles: Vec<DbLawyerProfile> = qb.build_query_as().fetch_all(&mut *conn).await?;
    hydrate(&mut *conn, profiles).await
}

/// Attach service cities to profile rows, keeping their order.
async fn hydrate(
    conn: &mut SqliteConnection,
    profiles: Vec<DbLawyerProfile>,
) -> Result<Vec<LawyerProfileResponse>, ApiError> {
    let ids: Vec<i64> = profiles.iter().map(|p| p.id).collect();
    let mut cities = service_cities(conn, &ids).await?;

    profiles
        .into_iter()
        .map(|p| {
            let own = cities.remove(&p.id).unwrap_or_default();
            LawyerProfileResponse::from_db(p, own)
        })
        .collect()
}

async fn service_cities(
    conn: &mut SqliteConnection,
    lawyer_ids: &[i64],
) -> Result<HashMap<i64, Vec<City>>, sqlx::Error> {
    let mut by_lawyer: HashMap<i64, Vec<City>> = HashMap::new();
    if lawyer_ids.is_empty() {
        return Ok(by_lawyer);
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT lsc.lawyer_id, c.id, c.name FROM lawyer_service_cities lsc \
         JOIN cities c ON c.id = lsc.city_id WHERE lsc.lawyer_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in lawyer_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY c.name");

    let rows: Vec<(i64, i64, String)> = qb.build_query_as().fetch_all(&mut *conn).await?;
    for (lawyer_id, id, name) in rows {
        by_lawyer.entry(lawyer_id).or_default().push(City { id, name });
    }
    Ok(by_lawyer)
}

/// Replace the full set of service cities of a profile.
///
/// Every id must name an existing city; the first unknown id is reported
/// against `service_city_ids`.
pub async fn set_service_cities(
    conn: &mut SqliteConnection,
    lawyer_id: i64,
    city_ids: &[i64],
) -> Result<(), ApiError> {
    if !city_ids.is_empty() {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id FROM cities WHERE id IN (");
        let mut sep = qb.separated(", ");
        for id in city_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(")");
        let known: Vec<i64> = qb.build_query_scalar().fetch_all(&mut *conn).await?;

        if let Some(missing) = city_ids.iter().find(|id| !known.contains(*id)) {
            return Err(ApiError::validation(
                "service_city_ids",
                format!("Invalid pk \"{}\" - object does not exist.", missing),
            ));
        }
    }

    sqlx::query("DELETE FROM lawyer_service_cities WHERE lawyer_id = ?")
        .bind(lawyer_id)
        .execute(&mut *conn)
        .await?;

    for city_id in city_ids {
        sqlx::query("INSERT INTO lawyer_service_cities (lawyer_id, city_id) VALUES (?, ?)")
            .bind(lawyer_id)
            .bind(*city_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Look a city up by id, or `NotFound`.
pub async fn fetch_city<'c, A>(db: A, id: i64) -> Result<City, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = db.acquire().await?;
    let city: Option<City> = sqlx::query_as("SELECT id, name FROM cities WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    city.ok_or_else(|| ApiError::NotFound(format!("City not found: {}", id)))
}

/// Names of the cities a profile serves.
pub async fn service_city_names<'c, A>(db: A, lawyer_id: i64) -> Result<Vec<String>, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = db.acquire().await?;
    let names = sqlx::query_scalar(
        "SELECT c.name FROM lawyer_service_cities lsc JOIN cities c ON c.id = lsc.city_id \
         WHERE lsc.lawyer_id = ?",
    )
    .bind(lawyer_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(names)
}

/// Names of the cities with the given ids; unknown ids are skipped.
pub async fn city_names_by_id<'c, A>(db: A, ids: &[i64]) -> Result<Vec<String>, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut conn = db.acquire().await?;
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT name FROM cities WHERE id IN (");
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(*id);
    }
    sep.push_unseparated(")");
    let names = qb.build_query_scalar().fetch_all(&mut *conn).await?;
    Ok(names)
}

/// Complaints whose incident or residential city is one of `names`, newest
/// first, as brief projections.
///
/// City names match exactly. Privacy settings are not applied here; the
/// brief projection never carries identity fields.
pub async fn complaints_in_cities<'c, A>(db: A, names: &[String]) -> Result<Vec<ComplaintBrief>, ApiError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let mut conn = db.acquire().await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT c.id, c.title, c.created_at, c.privacy_option, \
         il.city AS incident_city, r.city AS residential_city \
         FROM complaints c \
         LEFT JOIN incident_locations il ON il.id = c.incident_location_id \
         LEFT JOIN residentials r ON r.id = c.residential_address_id \
         WHERE il.city IN (",
    );
    push_names(&mut qb, names);
    qb.push(" OR r.city IN (");
    push_names(&mut qb, names);
    qb.push(" ORDER BY c.created_at DESC, c.id DESC");

    let rows: Vec<DbComplaintBrief> = qb.build_query_as().fetch_all(&mut *conn).await?;
    rows.into_iter().map(ComplaintBrief::try_from).collect()
}

fn push_names(qb: &mut QueryBuilder<'_, Sqlite>, names: &[String]) {
    let mut sep = qb.separated(", ");
    for name in names {
        sep.push_bind(name.clone());
    }
    sep.push_unseparated(")");
}

/// Map a UNIQUE violation on `err` to `Conflict` with the message chosen by
/// `describe`; any other error passes through as a database error.
pub fn conflict_or(err: sqlx::Error, describe: impl FnOnce(&str) -> String) -> ApiError {
    match unique_violation(&err) {
        Some(message) => ApiError::Conflict(describe(&message)),
        None => ApiError::Database(err),
    }
}
