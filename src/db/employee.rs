//! Employee repository: keyed writes, ordered scans, and id allocation.

use crate::entities::{empleados, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

/// List all employees ordered by id ascending.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<empleados::Model>, DbErr> {
    Empleados::find().order_by_asc(empleados::Column::Id).all(db).await
}

/// Get employee by id.
pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<empleados::Model>, DbErr> {
    Empleados::find_by_id(id.to_owned()).one(db).await
}

/// Highest existing id, taken from an ordered query limited to one row.
///
/// Zero-padded ids sort the same lexicographically and numerically.
pub async fn last_id(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
    let last = Empleados::find()
        .order_by_desc(empleados::Column::Id)
        .limit(1)
        .one(db)
        .await?;

    Ok(last.map(|m| m.id))
}

/// Propose the next id given the current highest one.
///
/// Absent or unparsable ids count as 0; the result is zero-padded to 8
/// digits.
pub fn next_id_after(last: Option<&str>) -> String {
    let max = last.and_then(|id| id.parse::<u64>().ok()).unwrap_or(0);
    format!("{:08}", max + 1)
}

/// Allocate the next employee id.
pub async fn next_id(db: &DatabaseConnection) -> Result<String, DbErr> {
    let last = last_id(db).await?;
    Ok(next_id_after(last.as_deref()))
}

/// Write or replace the record keyed by its id.
///
/// Runs identically for create and edit; the id is never regenerated here.
pub async fn save(db: &DatabaseConnection, record: empleados::Model) -> Result<empleados::Model, DbErr> {
    let active = empleados::ActiveModel {
        id: Set(record.id.clone()),
        name: Set(record.name.clone()),
        role: Set(record.role.clone()),
        phone: Set(record.phone.clone()),
        address: Set(record.address.clone()),
        salary: Set(record.salary.clone()),
        schedule: Set(record.schedule.clone()),
        email: Set(record.email.clone()),
    };

    Empleados::insert(active)
        .on_conflict(
            OnConflict::column(empleados::Column::Id)
                .update_columns([
                    empleados::Column::Name,
                    empleados::Column::Role,
                    empleados::Column::Phone,
                    empleados::Column::Address,
                    empleados::Column::Salary,
                    empleados::Column::Schedule,
                    empleados::Column::Email,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(record)
}

/// Delete an employee by id.
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
    let result = Empleados::delete_by_id(id.to_owned()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Count employee records.
pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    Empleados::find().count(db).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_after_existing() {
        // Highest of ["00000003", "00000007"] is what the limited query returns
        assert_eq!(next_id_after(Some("00000007")), "00000008");
    }

    #[test]
    fn test_next_id_after_none() {
        assert_eq!(next_id_after(None), "00000001");
    }

    #[test]
    fn test_next_id_after_unparsable() {
        assert_eq!(next_id_after(Some("not-a-number")), "00000001");
    }

    #[test]
    fn test_next_id_keeps_padding() {
        assert_eq!(next_id_after(Some("00000099")), "00000100");
        assert_eq!(next_id_after(Some("99999999")), "100000000");
    }
}
