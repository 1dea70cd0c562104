//! Cursor pagination over list endpoints.
//!
//! List endpoints return newest-first pages with a `next` link while older
//! items remain. The next page is requested with `older_than` set to the id
//! of the last item received.

use crate::types::{Notification, NotificationList, ReceivedTextMessage, ReceivedTextMessageList};
use crate::Result;
use std::collections::VecDeque;
use uuid::Uuid;

/// A list response that can be walked with an `older_than` cursor.
pub trait Page {
    type Item;

    /// Items of this page and whether a further page exists.
    fn into_items(self) -> (Vec<Self::Item>, bool);

    fn cursor(item: &Self::Item) -> Uuid;
}

impl Page for NotificationList {
    type Item = Notification;

    fn into_items(self) -> (Vec<Notification>, bool) {
        let more = self.links.has_next();
        (self.notifications, more)
    }

    fn cursor(item: &Notification) -> Uuid {
        item.id()
    }
}

impl Page for ReceivedTextMessageList {
    type Item = ReceivedTextMessage;

    fn into_items(self) -> (Vec<ReceivedTextMessage>, bool) {
        let more = self.links.has_next();
        (self.received_text_messages, more)
    }

    fn cursor(item: &ReceivedTextMessage) -> Uuid {
        item.id
    }
}

/// Items across pages, fetched lazily.
///
/// A failed fetch is yielded once as `Err` and ends the iteration.
pub struct Pages<'a, P: Page> {
    fetch: Box<dyn FnMut(Option<Uuid>) -> Result<P> + 'a>,
    buffered: VecDeque<P::Item>,
    cursor: Option<Uuid>,
    exhausted: bool,
}

impl<'a, P: Page> Pages<'a, P> {
    pub(crate) fn new(
        start: Option<Uuid>,
        fetch: impl FnMut(Option<Uuid>) -> Result<P> + 'a,
    ) -> Self {
        Self {
            fetch: Box::new(fetch),
            buffered: VecDeque::new(),
            cursor: start,
            exhausted: false,
        }
    }
}

impl<P: Page> Iterator for Pages<'_, P> {
    type Item = Result<P::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }
            if self.exhausted {
                return None;
            }
            match (self.fetch)(self.cursor) {
                Ok(page) => {
                    let (items, more) = page.into_items();
                    match items.last() {
                        // An empty page cannot move the cursor.
                        Some(last) if more => self.cursor = Some(P::cursor(last)),
                        _ => self.exhausted = true,
                    }
                    self.buffered.extend(items);
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
