//! Form and view state sitting between the command line and the [`Blog`].
//!
//! Holds no posts of its own: every view is derived from the blog on demand.

use anyhow::Result;
use blg_core::{Blog, Entry, EntryId, KeyValueStore};

/// Fields of the post being written. `edit_id` switches between creating a
/// new post and editing an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub edit_id: Option<EntryId>,
    pub title: String,
    pub content: String,
    /// Comma separated, as typed.
    pub tags: String,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Created(Entry),
    Updated(Entry),
    /// Title or content was empty; nothing was sent to the blog.
    Rejected,
    NotFound(EntryId),
}

/// What the list view currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewQuery {
    #[default]
    All,
    /// Case-insensitive substring over tags.
    Keyword(String),
    /// Exact tag.
    Tag(String),
}

pub struct BlogUi<'a, S: KeyValueStore> {
    blog: &'a mut Blog<S>,
    form: EditForm,
    query: ViewQuery,
}

impl<'a, S: KeyValueStore> BlogUi<'a, S> {
    pub fn new(blog: &'a mut Blog<S>) -> Self {
        Self {
            blog,
            form: EditForm::default(),
            query: ViewQuery::All,
        }
    }

    pub fn blog(&self) -> &Blog<S> {
        &*self.blog
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    pub fn is_editing(&self) -> bool {
        self.form.edit_id.is_some()
    }

    pub fn form_heading(&self) -> &'static str {
        if self.is_editing() { "Edit post" } else { "New post" }
    }

    /// Validates the form and creates or updates a post. The form is reset
    /// afterwards unless the input was rejected.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let title = self.form.title.trim().to_string();
        let content = self.form.content.trim().to_string();
        let tags = self.form.tags.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Ok(SubmitOutcome::Rejected);
        }

        let outcome = match self.form.edit_id {
            Some(id) => match self.blog.update(id, &title, &content, &tags)? {
                Some(entry) => SubmitOutcome::Updated(entry),
                None => SubmitOutcome::NotFound(id),
            },
            None => SubmitOutcome::Created(self.blog.add(&title, &content, &tags)?),
        };
        self.reset_form();
        Ok(outcome)
    }

    /// Loads the post into the form and switches to edit mode.
    /// Returns `false` when there is no such post.
    pub fn begin_edit(&mut self, id: EntryId) -> bool {
        let Some(entry) = self.blog.get(id) else {
            return false;
        };
        self.form = EditForm {
            edit_id: Some(entry.id),
            title: entry.title.clone(),
            content: entry.content.clone(),
            tags: entry.tags.join(", "),
        };
        true
    }

    pub fn reset_form(&mut self) {
        self.form = EditForm::default();
    }

    /// Removes the post only once `confirm` agrees. Returns whether the
    /// removal went ahead.
    pub fn delete(&mut self, id: EntryId, confirm: impl FnOnce() -> bool) -> Result<bool> {
        if !confirm() {
            return Ok(false);
        }
        self.blog.remove(id)?;
        Ok(true)
    }

    /// Keyword search; a blank keyword shows everything.
    pub fn set_query(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        self.query = if keyword.is_empty() {
            ViewQuery::All
        } else {
            ViewQuery::Keyword(keyword.to_string())
        };
    }

    /// Picking a tag searches for it like a typed keyword.
    pub fn select_tag(&mut self, tag: &str) {
        self.set_query(tag);
    }

    /// Shows only posts carrying exactly `tag`.
    pub fn filter_tag(&mut self, tag: &str) {
        self.query = ViewQuery::Tag(tag.to_string());
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn visible_entries(&self) -> Vec<&Entry> {
        match &self.query {
            ViewQuery::All => self.blog.entries().iter().collect(),
            ViewQuery::Keyword(keyword) => self.blog.search_by_keyword(keyword),
            ViewQuery::Tag(tag) => self.blog.filter_by_tag(tag),
        }
    }
}
