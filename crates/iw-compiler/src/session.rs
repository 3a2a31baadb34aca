//! Session bootstrap
//!
//! Every interactive page shares one room connection. The head gets a
//! room-name negotiation script and the connection library; the body
//! constructs the connection first and tells it to connect last.

use iw_dom::ElementTemplate;

use crate::page::PageUrl;

/// Comment marking where the bootstrap goes in the head
pub const MARKER_COMMENT: &str = "interactive-widgets";

/// Client library implementing the room connection
pub const ROOM_CONNECTION_ASSET: &str = "RoomConnection.js";

/// Ensures the URL carries a valid `roomName` (UUIDv4), reloading with a
/// fresh one otherwise. Defines `currentRoomName`.
const ROOM_NAME_SCRIPT: &str = r#"
const currentUrl = new URL(window.location);
const currentUrlSearchParams = new URLSearchParams(currentUrl.search);
const currentRoomName = currentUrlSearchParams.get("roomName");
if (currentRoomName === null || !currentRoomName.match(new RegExp(/^[0-9A-F]{8}-[0-9A-F]{4}-4[0-9A-F]{3}-[89AB][0-9A-F]{3}-[0-9A-F]{12}$/i))) {
    const getRandomSymbol = (symbol) => {
        let array;
        if (symbol === "y") {
            array = ["8", "9", "a", "b"];
            return array[Math.floor(Math.random() * array.length)];
        }
        array = new Uint8Array(1);
        window.crypto.getRandomValues(array);
        return (array[0] % 16).toString(16);
    };
    const newRoomName = "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx".replace(/[xy]/g, getRandomSymbol);
    currentUrlSearchParams.set("roomName", newRoomName);
    currentUrl.search = currentUrlSearchParams;
    window.location.replace(currentUrl.toString());
}
"#;

/// Head scripts, in insertion order
pub fn head_scripts(page: &PageUrl) -> [ElementTemplate; 2] {
    [
        ElementTemplate::inline_script(ROOM_NAME_SCRIPT),
        ElementTemplate::script_src(page.relative(&format!("/{ROOM_CONNECTION_ASSET}"))),
    ]
}

/// First script of the body
pub fn construction_script() -> ElementTemplate {
    ElementTemplate::inline_script("const roomConnection = new RoomConnection(currentRoomName);")
}

/// Last script of the body, after every widget has registered
pub fn ready_script() -> ElementTemplate {
    ElementTemplate::inline_script("roomConnection.readyForConnecting();")
}

/// Whether a comment's content is the bootstrap marker
pub fn is_marker(comment: &str) -> bool {
    comment.trim() == MARKER_COMMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_connection_is_relative() {
        let [_, library] = head_scripts(&PageUrl::new("a/b/"));
        assert_eq!(library.get_attr("src"), Some("../../RoomConnection.js"));

        let [_, library] = head_scripts(&PageUrl::root());
        assert_eq!(library.get_attr("src"), Some("RoomConnection.js"));
    }

    #[test]
    fn test_marker() {
        assert!(is_marker(" interactive-widgets "));
        assert!(!is_marker("interactive widgets"));
    }
}
