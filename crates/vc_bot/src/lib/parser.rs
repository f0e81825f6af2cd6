//! # Yt Parser
//!
//! This module scrapes the JSON blobs YouTube inlines into its pages: the
//! `ytInitialData` of channel listings and the `ytInitialPlayerResponse` of
//! watch pages, plus the timedtext caption payloads they point at.

use std::{ops::Deref, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use transcript_store::{Segment, VideoId};

use crate::{
    error::Error,
    resolve::resolve_channel_id,
    types::{CaptionTrack, TimedText, VideoRenderer},
};

static YT_INTIALDATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)<script[^>]*>\s*var\s+ytInitialData\s*=\s*(\{.*?\});\s*</script>")
        .unwrap()
});

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

/// Collects the video ids listed on a channel's videos tab.
///
/// Only the first page of the grid is present in `ytInitialData`; continuation
/// items are ignored. Upcoming premieres are skipped and duplicates removed.
#[tracing::instrument(skip(json))]
pub fn parse_video_ids(json: &Value) -> Result<Vec<VideoId>, Error> {
    let tabs = json["contents"]["twoColumnBrowseResultsRenderer"]["tabs"]
        .as_array()
        .ok_or(Error::ParseError(
            "Failed to get ytInitialData['contents']['twoColumnBrowseResultsRenderer']['tabs']",
        ))?;

    let contents = tabs
        .iter()
        .find_map(|tab| tab["tabRenderer"]["content"]["richGridRenderer"]["contents"].as_array())
        .ok_or(Error::ParseError(
            "Failed to find a richGridRenderer in channel tabs, structure might have changed",
        ))?;

    let mut video_ids = Vec::new();

    for item in contents {
        let Some(video_renderer) = item["richItemRenderer"]["content"]["videoRenderer"].as_object()
        else {
            // continuation tokens and shelf items
            continue;
        };
        let video_renderer =
            serde_json::from_value::<VideoRenderer>(Value::Object(video_renderer.clone()))?;

        if video_renderer.upcoming_event_data.is_some() {
            continue;
        }

        match VideoId::parse(&video_renderer.video_id) {
            Some(video_id) => video_ids.push(video_id),
            None => tracing::warn!(video_id = %video_renderer.video_id, "Skipping malformed video id"),
        }
    }

    Ok(video_ids.into_iter().unique().collect())
}

/// Caption tracks advertised by a watch page's player response.
pub fn caption_tracks(player_response: &Value) -> Result<Vec<CaptionTrack>, Error> {
    let tracks = &player_response["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"];

    if tracks.is_null() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_value(tracks.clone())?)
}

/// Prefers an uploaded English track, then auto-generated English, then
/// whatever comes first.
pub fn pick_caption_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    let is_english = |t: &&CaptionTrack| t.language_code.starts_with("en");

    tracks
        .iter()
        .filter(is_english)
        .find(|t| !t.is_generated())
        .or_else(|| tracks.iter().find(is_english))
        .or_else(|| tracks.first())
}

/// Converts a json3 timedtext payload into caption segments, dropping events
/// that carry no text (window setup, line breaks).
pub fn timed_text_segments(timed_text: TimedText) -> Vec<Segment> {
    timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs?
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ")
                .trim()
                .to_string();

            (!text.is_empty()).then(|| Segment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect()
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    pub fn to_json<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        YT_INTIALDATA_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialData from the page's script tag",
            ))
    }

    pub fn player_response<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialPlayerResponse from the watch page",
            ))
    }

    pub fn channel_id(&self) -> Option<String> {
        resolve_channel_id(self)
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
