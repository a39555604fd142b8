//! The collection manager: owns every post and is the only writer of the
//! persisted snapshot.

use crate::Config;
use crate::clock::{Clock, SystemClock};
use crate::entry::{Entry, EntryId};
use crate::record::{decode_snapshot, encode_snapshot};
use crate::store::{FileStore, KeyValueStore};
use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, error, warn};

/// All posts, most recently updated first.
///
/// Every mutation is applied in memory, re-sorted and then written to the
/// store as one full snapshot.
pub struct Blog<S: KeyValueStore> {
    store: S,
    key: String,
    entries: Vec<Entry>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> Blog<S> {
    /// Loads the collection from the `key` slot of `store`.
    ///
    /// A missing slot gives an empty collection. So does a slot that cannot be
    /// read or parsed; the fault is logged, never returned.
    pub fn load(store: S, key: &str) -> Self {
        Self::load_with_clock(store, key, Box::new(SystemClock))
    }

    pub fn load_with_clock(store: S, key: &str, clock: Box<dyn Clock>) -> Self {
        let entries = read_snapshot(&store, key);
        let mut blog = Self {
            store,
            key: key.to_string(),
            entries,
            clock,
        };
        blog.sort();
        blog
    }

    /// Creates a post, persists the collection and returns the new post.
    /// Inputs are not validated here.
    pub fn add(&mut self, title: &str, content: &str, tags_raw: &str) -> Result<Entry> {
        let now = self.now();
        let last_id = self.entries.iter().map(|e| e.id).max();
        let id = EntryId::next(now, last_id)?;
        let entry = Entry::create(id, title, content, tags_raw, now);
        self.entries.push(entry.clone());
        self.sort();
        self.save()?;
        Ok(entry)
    }

    /// Edits the post with `id`. Returns `Ok(None)` and touches nothing when
    /// no such post exists.
    pub fn update(
        &mut self,
        id: EntryId,
        title: &str,
        content: &str,
        tags_raw: &str,
    ) -> Result<Option<Entry>> {
        let now = self.now();
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        entry.edit(title, content, tags_raw, now);
        let updated = entry.clone();
        self.sort();
        self.save()?;
        Ok(Some(updated))
    }

    /// Removes the post with `id` if present. The snapshot is written either way.
    pub fn remove(&mut self, id: EntryId) -> Result<()> {
        self.entries.retain(|e| e.id != id);
        self.save()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Posts with at least one tag containing `keyword`, ignoring case.
    /// Only tags are searched, not title or content.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&Entry> {
        let needle = keyword.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.tags.iter().any(|t| t.to_lowercase().contains(&needle)))
            .collect()
    }

    /// Posts carrying exactly `tag` (case sensitive).
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Every distinct tag, in the order it is first seen in the collection.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.entries.iter().flat_map(|e| e.tags.iter()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Millisecond precision, the resolution the snapshot keeps.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Most recently updated first. Stable, so ties keep their order.
    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.updated_date.cmp(&a.updated_date));
    }

    fn save(&mut self) -> Result<()> {
        let raw = encode_snapshot(&self.entries)?;
        self.store
            .set(&self.key, &raw)
            .with_context(|| format!("saving posts to slot `{}`", self.key))?;
        debug!("saved {} posts to slot `{}`", self.entries.len(), self.key);
        Ok(())
    }
}

impl Blog<FileStore> {
    /// Opens the posts saved in the data dir of `config`.
    pub fn open(config: &Config) -> Self {
        Self::load(config.store(), &config.store_key)
    }
}

fn read_snapshot<S: KeyValueStore>(store: &S, key: &str) -> Vec<Entry> {
    match store.get(key) {
        Ok(None) => {
            debug!("slot `{key}` is empty, starting with no posts");
            Vec::new()
        }
        Ok(Some(raw)) => match decode_snapshot(&raw) {
            Ok(entries) => {
                debug!("loaded {} posts from slot `{key}`", entries.len());
                entries
            }
            Err(e) => {
                warn!("discarding unreadable posts in slot `{key}`: {e:#}");
                Vec::new()
            }
        },
        Err(e) => {
            error!("could not read slot `{key}`, starting with no posts: {e:#}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tests::{StepClock, base_time, mk_config};
    use chrono::Duration;
    use tempfile::tempdir;

    const KEY: &str = "blogs";

    fn mk_blog(step_secs: i64) -> (Blog<MemoryStore>, StepClock) {
        let clock = StepClock::new(base_time(), Duration::seconds(step_secs));
        let blog = Blog::load_with_clock(MemoryStore::new(), KEY, Box::new(clock.clone()));
        (blog, clock)
    }

    fn is_sorted(blog: &Blog<MemoryStore>) -> bool {
        blog.entries()
            .windows(2)
            .all(|w| w[0].updated_date >= w[1].updated_date)
    }

    fn stored(blog: &Blog<MemoryStore>) -> Option<String> {
        blog.store().get(KEY).unwrap()
    }

    #[test]
    fn add_persists_and_puts_newest_first() {
        let (mut blog, _) = mk_blog(60);
        let first = blog.add("First", "one", "").unwrap();
        let second = blog.add("Second", "two", "b").unwrap();

        assert_eq!(blog.len(), 2);
        assert_eq!(blog.entries()[0].id, second.id);
        assert_eq!(blog.entries()[1].id, first.id);

        let reloaded = decode_snapshot(&stored(&blog).unwrap()).unwrap();
        assert_eq!(reloaded, blog.entries());
    }

    #[test]
    fn add_parses_raw_tags() {
        let (mut blog, _) = mk_blog(60);
        let entry = blog.add("T", "C", "a, b ,,c").unwrap();
        assert_eq!(entry.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn ids_are_unique_within_the_same_millisecond() {
        let (mut blog, _) = mk_blog(0);
        let a = blog.add("A", "a", "").unwrap();
        let b = blog.add("B", "b", "").unwrap();
        let c = blog.add("C", "c", "").unwrap();
        assert_eq!(a.id, EntryId(base_time().timestamp_millis()));
        assert_eq!(b.id, EntryId(a.id.0 + 1));
        assert_eq!(c.id, EntryId(a.id.0 + 2));
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let (mut blog, _) = mk_blog(0);
        let a = blog.add("A", "a", "").unwrap();
        let b = blog.add("B", "b", "").unwrap();
        let ids: Vec<EntryId> = blog.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn add_after_largest_stored_id_fails_without_mutation() {
        let mut store = MemoryStore::new();
        let raw = format!(
            r#"[{{"id":{},"title":"T","content":"C","tags":[],"createdDate":"2025-08-15T08:00:00.000Z","updatedDate":"2025-08-15T08:00:00.000Z"}}]"#,
            i64::MAX
        );
        store.set(KEY, &raw).unwrap();
        let mut blog = Blog::load(store, KEY);

        assert!(blog.add("N", "c", "").is_err());
        assert_eq!(blog.len(), 1);
        assert_eq!(blog.store().get(KEY).unwrap(), Some(raw));
    }

    #[test]
    fn update_moves_entry_to_front() {
        let (mut blog, _) = mk_blog(60);
        let first = blog.add("First", "one", "").unwrap();
        blog.add("Second", "two", "").unwrap();

        let updated = blog
            .update(first.id, "First!", "one\nmore", "x")
            .unwrap()
            .expect("entry exists");

        assert_eq!(updated.created_date, first.created_date);
        assert!(updated.updated_date > first.updated_date);
        assert_eq!(blog.entries()[0].id, first.id);
        assert_eq!(blog.entries()[0].title, "First!");
        assert_eq!(blog.get(first.id).unwrap().tags, vec!["x"]);
    }

    #[test]
    fn update_unknown_id_changes_nothing() {
        let (mut blog, _) = mk_blog(60);
        blog.add("First", "one", "a").unwrap();
        blog.add("Second", "two", "b").unwrap();
        let before = blog.entries().to_vec();
        let stored_before = stored(&blog);

        let result = blog.update(EntryId(42), "X", "Y", "z").unwrap();

        assert!(result.is_none());
        assert_eq!(blog.entries(), before.as_slice());
        assert_eq!(stored(&blog), stored_before);
    }

    #[test]
    fn remove_deletes_and_persists() {
        let (mut blog, _) = mk_blog(60);
        let a = blog.add("A", "a", "").unwrap();
        let b = blog.add("B", "b", "").unwrap();

        blog.remove(a.id).unwrap();

        assert!(blog.get(a.id).is_none());
        assert_eq!(blog.len(), 1);
        let reloaded = decode_snapshot(&stored(&blog).unwrap()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, b.id);
    }

    #[test]
    fn remove_unknown_id_still_writes_valid_snapshot() {
        let (mut blog, _) = mk_blog(60);
        blog.add("A", "a", "t").unwrap();
        let stored_before = stored(&blog);

        blog.remove(EntryId(7)).unwrap();

        assert_eq!(blog.len(), 1);
        assert_eq!(stored(&blog), stored_before);
        assert!(decode_snapshot(&stored(&blog).unwrap()).is_ok());
    }

    #[test]
    fn remove_on_empty_blog_writes_empty_array() {
        let (mut blog, _) = mk_blog(60);
        blog.remove(EntryId(7)).unwrap();
        assert_eq!(stored(&blog).as_deref(), Some("[]"));
    }

    #[test]
    fn get_unknown_id_is_none() {
        let (mut blog, _) = mk_blog(60);
        blog.add("A", "a", "").unwrap();
        assert!(blog.get(EntryId(1)).is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring_on_tags() {
        let (mut blog, _) = mk_blog(60);
        let a = blog.add("A", "tag1 in content only", "other").unwrap();
        let b = blog.add("B", "b", "Tag1").unwrap();
        let c = blog.add("C", "c", "mytag10, misc").unwrap();
        let d = blog.add("D", "d", "tag1").unwrap();

        let found: Vec<EntryId> = blog.search_by_keyword("tag1").iter().map(|e| e.id).collect();
        assert_eq!(found, vec![d.id, c.id, b.id]);
        assert!(!found.contains(&a.id));

        let exact: Vec<EntryId> = blog.filter_by_tag("Tag1").iter().map(|e| e.id).collect();
        assert_eq!(exact, vec![b.id]);
    }

    #[test]
    fn search_leaves_collection_untouched() {
        let (mut blog, _) = mk_blog(60);
        blog.add("A", "a", "x").unwrap();
        blog.add("B", "b", "y").unwrap();
        let before = blog.entries().to_vec();
        let _ = blog.search_by_keyword("x");
        let _ = blog.filter_by_tag("y");
        assert_eq!(blog.entries(), before.as_slice());
    }

    #[test]
    fn all_tags_are_unique_in_first_seen_order() {
        let (mut blog, _) = mk_blog(60);
        blog.add("A", "a", "rust, notes").unwrap();
        blog.add("B", "b", "life, rust").unwrap();
        assert_eq!(blog.all_tags(), vec!["life", "rust", "notes"]);
    }

    #[test]
    fn collection_stays_sorted_through_mixed_operations() {
        let clock = StepClock::new(base_time(), Duration::seconds(1));
        let mut blog = Blog::load_with_clock(MemoryStore::new(), KEY, Box::new(clock.clone()));
        let mut ids = Vec::new();

        for round in 0..30u32 {
            match round % 5 {
                0 | 1 | 3 => ids.push(blog.add(&format!("Post {round}"), "body", "t").unwrap().id),
                2 => {
                    let target = ids[(round as usize * 7) % ids.len()];
                    blog.update(target, "edited", "body", "t").unwrap();
                }
                _ => {
                    let target = ids.remove((round as usize * 3) % ids.len());
                    blog.remove(target).unwrap();
                }
            }
            // a clock going backwards must not break the ordering either
            if round % 4 == 0 {
                clock.rewind(Duration::seconds(3));
            }
            assert!(is_sorted(&blog), "unsorted after round {round}");
        }
        assert_eq!(blog.len(), ids.len());
    }

    #[test]
    fn load_sorts_stored_entries() {
        let (mut blog, _) = mk_blog(60);
        blog.add("Old", "a", "").unwrap();
        blog.add("New", "b", "").unwrap();
        let mut reversed = blog.entries().to_vec();
        reversed.reverse();

        let mut store = MemoryStore::new();
        store.set(KEY, &encode_snapshot(&reversed).unwrap()).unwrap();
        let loaded = Blog::load(store, KEY);

        assert_eq!(loaded.entries()[0].title, "New");
        assert_eq!(loaded.entries()[1].title, "Old");
    }

    #[test]
    fn corrupt_slot_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(KEY, "[{\"id\": oops").unwrap();
        let blog = Blog::load(store, KEY);
        assert!(blog.is_empty());
    }

    #[test]
    fn legacy_joined_tags_load_and_resave_as_array() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY,
                r#"[{"id":1,"title":"T","content":"C","tags":"a, b","createdDate":"2025-08-15T08:00:00.000Z","updatedDate":"2025-08-15T08:00:00.000Z"}]"#,
            )
            .unwrap();
        let mut blog = Blog::load(store, KEY);
        assert_eq!(blog.get(EntryId(1)).unwrap().tags, vec!["a", "b"]);

        blog.remove(EntryId(99)).unwrap();
        let raw = blog.store().get(KEY).unwrap().unwrap();
        assert!(raw.contains(r#""tags":["a","b"]"#));
    }

    #[test]
    fn file_backed_blog_survives_reload() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("blg");

        let mut blog = Blog::load(FileStore::new(&dir), KEY);
        let a = blog.add("Hello", "multi\nline", "a, b").unwrap();
        blog.add("World", "text", "").unwrap();
        let before = blog.entries().to_vec();

        let reloaded = Blog::load(FileStore::new(&dir), KEY);
        assert_eq!(reloaded.entries(), before.as_slice());
        assert_eq!(reloaded.get(a.id).unwrap().content, "multi\nline");
    }

    #[test]
    fn open_uses_configured_slot() {
        let tmp = tempdir().unwrap();
        let config = mk_config(tmp.path().join("blg"));

        let mut blog = Blog::open(&config);
        blog.add("Hello", "world", "").unwrap();

        assert!(config.store_path().exists());
        assert_eq!(Blog::open(&config).len(), 1);
    }

    #[test]
    fn unreadable_file_slot_loads_empty() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        // a directory where the slot file should be makes the read fail
        std::fs::create_dir_all(store.slot_path(KEY)).unwrap();
        let blog = Blog::load(store, KEY);
        assert!(blog.is_empty());
    }
}
