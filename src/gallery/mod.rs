mod sort;

pub use sort::{Direction, SortField, SortKey};

use crate::error::{Error, Result};
use crate::fetch::VideoSource;
use crate::video::{normalize_path, validate_batch, VideoRecord};
use std::collections::HashMap;
use tracing::{info, warn};

/// What the gallery is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Flat list of videos whose path contains `filter`.
    Flat { filter: String },
    /// Videos grouped by the folder they live in.
    Folders,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Flat {
            filter: String::new(),
        }
    }
}

/// Videos sharing one folder key.
#[derive(Debug, PartialEq)]
pub struct FolderGroup<'a> {
    pub folder: &'a str,
    pub videos: Vec<&'a VideoRecord>,
}

/// Holds the fetched list and derives the filtered, sorted and grouped views.
pub struct VideoList {
    source: Box<dyn VideoSource>,
    videos: Vec<VideoRecord>,
    mode: ViewMode,
    sort_key: SortKey,
}

impl VideoList {
    pub fn new(source: Box<dyn VideoSource>) -> VideoList {
        VideoList {
            source,
            videos: Vec::new(),
            mode: ViewMode::default(),
            sort_key: SortKey::default(),
        }
    }

    /// Fetches the list again and replaces the loaded one. A failed fetch or
    /// a batch with a bad record leaves the previous list in place.
    pub fn refresh(&mut self) -> Result<()> {
        let batch = self.source.fetch()?;
        let videos = validate_batch(&batch).map_err(|e| {
            warn!("rejecting video list: {}", e);
            Error::from(e)
        })?;

        info!("loaded {} videos", videos.len());
        self.videos = videos;
        Ok(())
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    pub fn find_by_hash(&self, hash: &str) -> Option<&VideoRecord> {
        self.videos.iter().find(|v| v.hash == hash)
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// Filter used by [`VideoList::filtered_sorted`]; empty in folder mode.
    pub fn path_filter(&self) -> &str {
        match &self.mode {
            ViewMode::Flat { filter } => filter,
            ViewMode::Folders => "",
        }
    }

    pub fn set_path_filter(&mut self, filter: impl Into<String>) {
        self.mode = ViewMode::Flat {
            filter: filter.into(),
        };
    }

    pub fn show_folders(&mut self) {
        self.mode = ViewMode::Folders;
    }

    /// Leaves the folder view for the flat list scoped to `folder`.
    pub fn select_folder(&mut self, folder: &str) {
        info!("selecting folder {}", folder);
        self.set_path_filter(folder);
    }

    /// Videos whose path contains the filter (case-insensitive), sorted by
    /// the current key.
    pub fn filtered_sorted(&self) -> Vec<&VideoRecord> {
        let needle = normalize_path(self.path_filter()).to_lowercase();
        let mut res: Vec<&VideoRecord> = self
            .videos
            .iter()
            .filter(|v| v.path.to_lowercase().contains(&needle))
            .collect();

        let key = self.sort_key;
        res.sort_by(|a, b| key.compare(a, b));
        res
    }

    /// Partitions the list by folder, in order of first appearance.
    pub fn grouped_by_folder(&self) -> Vec<FolderGroup<'_>> {
        let mut groups: Vec<FolderGroup<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for video in &self.videos {
            let folder = video.folder();
            match index.get(folder) {
                Some(&i) => groups[i].videos.push(video),
                None => {
                    index.insert(folder, groups.len());
                    groups.push(FolderGroup {
                        folder,
                        videos: vec![video],
                    });
                }
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted(RefCell<VecDeque<std::result::Result<Vec<Value>, FetchError>>>);

    impl VideoSource for Scripted {
        fn fetch(&self) -> std::result::Result<Vec<Value>, FetchError> {
            self.0
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn wire(path: &str, name: &str, size: u64, date: &str) -> Value {
        json!({
            "path": path,
            "name": name,
            "size": size,
            "modified_at": date,
            "hash": format!("h-{}", path),
        })
    }

    fn loaded(batch: Vec<Value>) -> VideoList {
        let source = Scripted(RefCell::new(VecDeque::from(vec![Ok(batch)])));
        let mut list = VideoList::new(Box::new(source));
        list.refresh().unwrap();
        list
    }

    fn sample() -> Vec<Value> {
        vec![
            wire("a/video/b.mp4", "b", 10, "2020-01-01"),
            wire("a/video/c.mp4", "c", 5, "2021-01-01"),
        ]
    }

    fn names(videos: &[&VideoRecord]) -> Vec<String> {
        videos.iter().map(|v| v.name.clone()).collect()
    }

    #[test]
    fn defaults_match_gallery_start_state() {
        let list = VideoList::new(Box::new(Scripted(RefCell::new(VecDeque::new()))));
        assert_eq!(list.path_filter(), "");
        assert_eq!(list.sort_key().to_string(), "nameu");
        assert!(list.videos().is_empty());
    }

    #[test]
    fn sorts_by_size_and_name() {
        let mut list = loaded(sample());

        list.set_sort_key("sizeu".parse().unwrap());
        assert_eq!(names(&list.filtered_sorted()), ["c", "b"]);

        list.set_sort_key("named".parse().unwrap());
        assert_eq!(names(&list.filtered_sorted()), ["c", "b"]);

        list.set_sort_key("dateu".parse().unwrap());
        assert_eq!(names(&list.filtered_sorted()), ["b", "c"]);
    }

    #[test]
    fn filter_is_case_insensitive_and_separator_agnostic() {
        let mut list = loaded(vec![
            wire(r"Movies\Summer\beach.mp4", "beach", 1, "2020-01-01"),
            wire("Movies/Winter/snow.mp4", "snow", 2, "2020-01-01"),
            wire("clips/other.webm", "other", 3, "2020-01-01"),
        ]);

        list.set_path_filter(r"movies\SUMMER");
        assert_eq!(names(&list.filtered_sorted()), ["beach"]);

        list.set_path_filter("MOVIES");
        assert_eq!(names(&list.filtered_sorted()), ["beach", "snow"]);

        list.set_path_filter("nothing-matches");
        assert!(list.filtered_sorted().is_empty());
    }

    #[test]
    fn filtering_does_not_touch_loaded_order() {
        let mut list = loaded(sample());
        list.set_sort_key("sizeu".parse().unwrap());
        let _ = list.filtered_sorted();
        assert_eq!(list.videos()[0].name, "b");
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let list = loaded(vec![
            wire("x/2/a.mp4", "a", 1, "2020-01-01"),
            wire("x/1/b.mp4", "b", 1, "2020-01-01"),
            wire(r"x\2\c.mp4", "c", 1, "2020-01-01"),
        ]);

        let groups = list.grouped_by_folder();
        let folders: Vec<&str> = groups.iter().map(|g| g.folder).collect();
        assert_eq!(folders, ["x/2", "x/1"]);
        assert_eq!(names(&groups[0].videos), ["a", "c"]);
        assert_eq!(names(&groups[1].videos), ["b"]);
    }

    #[test]
    fn select_folder_switches_to_scoped_list() {
        let mut list = loaded(vec![
            wire("x/2/a.mp4", "a", 1, "2020-01-01"),
            wire("x/1/b.mp4", "b", 1, "2020-01-01"),
        ]);
        list.show_folders();
        assert_eq!(list.mode(), &ViewMode::Folders);
        assert_eq!(list.path_filter(), "");

        list.select_folder("x/1");
        assert_eq!(
            list.mode(),
            &ViewMode::Flat {
                filter: "x/1".to_string()
            }
        );
        assert_eq!(names(&list.filtered_sorted()), ["b"]);
    }

    #[test]
    fn refresh_replaces_instead_of_appending() {
        let source = Scripted(RefCell::new(VecDeque::from(vec![
            Ok(sample()),
            Ok(vec![wire("z/only.mp4", "only", 1, "2020-01-01")]),
        ])));
        let mut list = VideoList::new(Box::new(source));
        list.refresh().unwrap();
        list.refresh().unwrap();
        assert_eq!(list.videos().len(), 1);
        assert_eq!(list.videos()[0].name, "only");
    }

    #[test]
    fn failed_refresh_keeps_stale_list() {
        let mut broken = wire("z/bad.mp4", "bad", 1, "2020-01-01");
        broken["hash"] = Value::Null;
        let source = Scripted(RefCell::new(VecDeque::from(vec![
            Ok(sample()),
            Ok(vec![broken]),
            Err(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        ])));
        let mut list = VideoList::new(Box::new(source));
        list.refresh().unwrap();

        assert!(matches!(list.refresh(), Err(Error::Validation(_))));
        assert_eq!(list.videos().len(), 2);

        assert!(matches!(list.refresh(), Err(Error::Fetch(FetchError::Status(_)))));
        assert_eq!(list.videos().len(), 2);
    }

    #[test]
    fn finds_by_hash() {
        let list = loaded(sample());
        assert_eq!(list.find_by_hash("h-a/video/c.mp4").unwrap().name, "c");
        assert!(list.find_by_hash("missing").is_none());
    }
}
