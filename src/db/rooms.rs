use sqlx::SqliteConnection;
use time::OffsetDateTime;

use super::{is_unique_violation, DbError, DbResult, Repository, Room, User};
use crate::events::{Created, Event};

const TAKEN: &str = "Name has already been taken";
// Direct rooms are named `private_<low id>_<high id>`.
const DIRECT_PREFIX: &str = "private_";

impl Repository {
    pub async fn public_rooms(&self) -> DbResult<Vec<Room>> {
        Ok(
            sqlx::query_as(
                "SELECT id,name,is_private,created_at,updated_at FROM rooms \
                 WHERE is_private=0 ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
        )
    }

    pub async fn find_room(&self, id: i64) -> DbResult<Room> {
        sqlx::query_as("SELECT id,name,is_private,created_at,updated_at FROM rooms WHERE id=?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound("Room"))
    }

    /// Like [`Repository::find_room`], but private rooms only exist for
    /// their participants.
    pub async fn visible_room(&self, id: i64, user_id: i64) -> DbResult<Room> {
        let room = self.find_room(id).await?;
        if room.is_private && !self.is_participant(user_id, id).await? {
            return Err(DbError::NotFound("Room"));
        }

        Ok(room)
    }

    pub async fn is_participant(&self, user_id: i64, room_id: i64) -> DbResult<bool> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT 1 FROM participants WHERE user_id=? AND room_id=?")
                .bind(user_id)
                .bind(room_id)
                .fetch_optional(&self.pool)
                .await?
                .is_some()
        )
    }

    #[cfg(test)]
    pub(crate) async fn participants(&self, room_id: i64) -> DbResult<Vec<super::Participant>> {
        Ok(
            sqlx::query_as(
                "SELECT id,user_id,room_id,created_at FROM participants WHERE room_id=? ORDER BY id",
            )
            .bind(room_id)
            .fetch_all(&self.pool)
            .await?
        )
    }

    /// Creates a public room and announces it.
    pub async fn create_room(&self, name: &str) -> DbResult<Created<Room>> {
        if name.trim().starts_with(DIRECT_PREFIX) {
            return Err(DbError::Invalid(vec![format!("Name can't start with {DIRECT_PREFIX}")]));
        }

        let mut conn = self.pool.acquire().await?;
        let room = insert_room(&mut conn, name, false).await?;
        tracing::info!(room_id = room.id, "created room {}", room.name);

        Ok(Created::announced(room.clone(), Event::RoomCreated(room)))
    }

    /// Creates a private room with one participant per user, atomically.
    pub async fn create_private_room(&self, user_ids: &[i64], name: &str) -> DbResult<Created<Room>> {
        let mut tx = self.pool.begin().await?;
        let room = insert_room(&mut tx, name, true).await?;
        for user_id in user_ids {
            add_participant(&mut tx, *user_id, room.id).await?;
        }
        tx.commit().await?;
        tracing::info!(room_id = room.id, members = user_ids.len(), "created private room {}", room.name);

        Ok(Created::quiet(room))
    }

    /// The private room shared by two users, opened on first use.
    pub async fn direct_room(&self, user: &User, other: &User) -> DbResult<Created<Room>> {
        let (low, high) = if user.id <= other.id { (user.id, other.id) } else { (other.id, user.id) };
        let name = format!("{DIRECT_PREFIX}{low}_{high}");

        let existing: Option<Room> = sqlx::query_as(
            "SELECT id,name,is_private,created_at,updated_at FROM rooms WHERE name=? AND is_private=1",
        )
        .bind(&name)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(room) => Ok(Created::quiet(room)),
            None => self.create_private_room(&[low, high], &name).await,
        }
    }

    pub async fn join_room(&self, user_id: i64, room_id: i64) -> DbResult<Room> {
        let room = self.visible_room(room_id, user_id).await?;
        let mut conn = self.pool.acquire().await?;
        add_participant(&mut conn, user_id, room.id).await?;

        Ok(room)
    }

    pub async fn leave_room(&self, user_id: i64, room_id: i64) -> DbResult<Room> {
        let room = self.visible_room(room_id, user_id).await?;
        sqlx::query("DELETE FROM participants WHERE user_id=? AND room_id=?")
            .bind(user_id)
            .bind(room.id)
            .execute(&self.pool)
            .await?;

        Ok(room)
    }
}

async fn insert_room(conn: &mut SqliteConnection, name: &str, is_private: bool) -> DbResult<Room> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DbError::Invalid(vec!["Name can't be blank".to_owned()]));
    }

    let taken = sqlx::query_scalar::<_, i64>("SELECT 1 FROM rooms WHERE name=?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
        .is_some();
    if taken {
        return Err(DbError::Invalid(vec![TAKEN.to_owned()]));
    }

    let now = OffsetDateTime::now_utc();
    sqlx::query_as(
        "INSERT INTO rooms (name,is_private,created_at,updated_at) VALUES (?,?,?,?) \
         RETURNING id,name,is_private,created_at,updated_at",
    )
    .bind(name)
    .bind(is_private)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            DbError::Invalid(vec![TAKEN.to_owned()])
        } else {
            err.into()
        }
    })
}

// Membership is a set: adding an existing participant is a no-op.
async fn add_participant(conn: &mut SqliteConnection, user_id: i64, room_id: i64) -> DbResult<()> {
    let now = OffsetDateTime::now_utc();
    sqlx::query(
        "INSERT OR IGNORE INTO participants (user_id,room_id,created_at,updated_at) VALUES (?,?,?,?)",
    )
    .bind(user_id)
    .bind(room_id)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
