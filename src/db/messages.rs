use time::OffsetDateTime;

use super::{DbError, DbResult, FeedMessage, Message, Repository, User};
use crate::events::{Created, Event};

impl Repository {
    /// Messages of a room, oldest first.
    pub async fn room_messages(&self, room_id: i64) -> DbResult<Vec<Message>> {
        Ok(
            sqlx::query_as(
                "SELECT id,content,user_id,room_id,created_at,updated_at FROM messages \
                 WHERE room_id=? ORDER BY created_at,id",
            )
            .bind(room_id)
            .fetch_all(&self.pool)
            .await?
        )
    }

    pub async fn room_feed(&self, room_id: i64) -> DbResult<Vec<FeedMessage>> {
        Ok(
            sqlx::query_as(
                "SELECT m.id,m.content,m.user_id,m.room_id,m.created_at,m.updated_at,u.username AS author \
                 FROM messages m JOIN users u ON u.id=m.user_id \
                 WHERE m.room_id=? ORDER BY m.created_at,m.id",
            )
            .bind(room_id)
            .fetch_all(&self.pool)
            .await?
        )
    }

    /// Posts `content` as `author`. A room the author cannot see is treated
    /// as missing.
    pub async fn create_message(
        &self,
        author: &User,
        room_id: Option<i64>,
        content: &str,
    ) -> DbResult<Created<Message>> {
        let mut errors = Vec::new();
        if content.trim().is_empty() {
            errors.push("Content can't be blank".to_owned());
        }

        let room = match room_id {
            Some(room_id) => match self.visible_room(room_id, author.id).await {
                Ok(room) => Some(room),
                Err(DbError::NotFound(_)) => None,
                Err(err) => return Err(err),
            },
            None => None,
        };

        let Some(room) = room else {
            errors.push("Room must exist".to_owned());
            return Err(DbError::Invalid(errors));
        };
        if !errors.is_empty() {
            return Err(DbError::Invalid(errors));
        }

        let now = OffsetDateTime::now_utc();
        let message: Message = sqlx::query_as(
            "INSERT INTO messages (content,user_id,room_id,created_at,updated_at) VALUES (?,?,?,?,?) \
             RETURNING id,content,user_id,room_id,created_at,updated_at",
        )
        .bind(content)
        .bind(author.id)
        .bind(room.id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(message_id = message.id, room_id = room.id, user_id = author.id, "message posted");

        let entry = FeedMessage {
            message: message.clone(),
            author: author.username.clone(),
        };
        Ok(Created::announced(message, Event::MessageCreated(entry)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{test_repo, DbError},
        events::Event,
    };

    #[tokio::test]
    async fn feed_is_oldest_first_with_authors() {
        let repo = test_repo().await;
        let alice = repo.create_user("alice").await.unwrap();
        let bob = repo.create_user("bob").await.unwrap();
        let room = repo.create_room("lobby").await.unwrap().record;

        for (author, content) in [(&alice, "one"), (&bob, "two"), (&alice, "three")] {
            repo.create_message(author, Some(room.id), content).await.unwrap();
        }

        let feed = repo.room_feed(room.id).await.unwrap();
        let seen: Vec<_> = feed
            .iter()
            .map(|entry| (entry.author.as_str(), entry.message.content.as_str()))
            .collect();
        assert_eq!(seen, [("alice", "one"), ("bob", "two"), ("alice", "three")]);
        assert!(feed.windows(2).all(|pair| pair[0].message.created_at <= pair[1].message.created_at));
    }

    #[tokio::test]
    async fn invalid_message_reports_every_problem() {
        let repo = test_repo().await;
        let alice = repo.create_user("alice").await.unwrap();

        match repo.create_message(&alice, Some(42), " ").await {
            Err(DbError::Invalid(errors)) => {
                assert_eq!(errors, vec!["Content can't be blank", "Room must exist"])
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(repo.room_messages(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn message_event_carries_author() {
        let repo = test_repo().await;
        let alice = repo.create_user("alice").await.unwrap();
        let room = repo.create_room("lobby").await.unwrap().record;

        let created = repo.create_message(&alice, Some(room.id), "hi").await.unwrap();
        match created.events.as_slice() {
            [Event::MessageCreated(entry)] => {
                assert_eq!(entry.author, "alice");
                assert_eq!(entry.message, created.record);
            }
            other => panic!("unexpected events {other:?}"),
        }
    }
}
