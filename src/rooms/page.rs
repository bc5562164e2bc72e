use crate::{
    db::{Repository, Room, User},
    include_res,
    res::{self, escape},
    AppResult,
};

use super::{index, room};

/// The composite chat page: public rooms, other users, the room form and,
/// when a room is open, its panel.
pub(crate) async fn render(
    repo: &Repository,
    user: &User,
    open: Option<&Room>,
    errors: &[String],
) -> AppResult<String> {
    let room_items: String = repo.public_rooms().await?.iter().map(index::room_item).collect();
    let user_items: String = repo.users_except(user.id).await?.iter().map(index::user_item).collect();

    let room_panel = match open {
        Some(room) => room::panel(room, &repo.room_feed(room.id).await?),
        None => include_res!(str, "/pages/rooms/empty.html").to_owned(),
    };

    Ok(include_res!(str, "/pages/index.html")
        .replace("{username}", &escape(&user.username))
        .replace("{errors}", &res::errors(errors))
        .replace("{room_items}", &room_items)
        .replace("{user_items}", &user_items)
        .replace("{room_panel}", &room_panel))
}
