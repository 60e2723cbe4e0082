//! Draw channel allocation and merging.
//!
//! Every visible column draws into its own channel (two when rows are
//! frozen), so each cell only needs one clip rect. At `end_table` channels
//! holding a single command that stays within its column are grouped by
//! freeze quadrant, given one shared clip rect and moved next to each other,
//! which lets the splitter fold each group into one draw command.

use std::mem;

use super::flags::{ColumnFlags, TableFlags};
use super::mask::ColumnMask;
use super::{Table, TableEnv, CHANNEL_BG0, CHANNEL_BG2_FROZEN};
use crate::geometry::Rect;
use crate::renderer::{ChannelSplitter, DrawChannel, DrawList};
use crate::stats;

/// Channels 0 (row backgrounds) and 1 (frozen bg2) never move.
const LEADING_DRAW_CHANNELS: usize = 2;

#[derive(Debug, Clone)]
struct MergeGroup {
    clip_rect: Rect,
    channels: ColumnMask,
    count: usize,
}

impl MergeGroup {
    fn new(channel_count: usize) -> Self {
        Self {
            clip_rect: Rect::new(f32::MAX, f32::MAX, -f32::MAX, -f32::MAX),
            channels: ColumnMask::with_capacity(channel_count),
            count: 0,
        }
    }
}

impl Table {
    /// Split the host draw list into as many channels as the layout needs
    /// and assign each column its channels.
    pub(crate) fn setup_draw_channels(&mut self, env: &mut TableEnv) {
        let freeze_row_multiplier = if self.freeze_rows_count > 0 { 2 } else { 1 };
        let channels_for_row = if self.flags.contains(TableFlags::NO_CLIP) {
            1
        } else {
            self.columns_enabled_count
        };
        let channels_for_bg = 1 + freeze_row_multiplier;
        let has_hidden = self.columns_enabled_count < self.columns.len()
            || self.visible_mask_by_index.count() != self.enabled_mask_by_index.count();
        let channels_for_dummy = usize::from(has_hidden);
        let channels_total = channels_for_bg + channels_for_row * freeze_row_multiplier + channels_for_dummy;

        env.splitter.split(channels_total);
        self.dummy_draw_channel = has_hidden.then(|| channels_total - 1);
        self.bg2_draw_channel_current = CHANNEL_BG2_FROZEN;
        self.bg2_draw_channel_unfrozen = if self.freeze_rows_count > 0 {
            2 + channels_for_row
        } else {
            CHANNEL_BG2_FROZEN
        };

        let no_clip = self.flags.contains(TableFlags::NO_CLIP);
        let dummy = self.dummy_draw_channel.unwrap_or(CHANNEL_BG0);
        let unfrozen_offset = if self.freeze_rows_count > 0 {
            channels_for_row + 1
        } else {
            0
        };
        let mut draw_channel_current = LEADING_DRAW_CHANNELS;
        for column in &mut self.columns {
            if column.is_visible_x {
                column.draw_channel_frozen = draw_channel_current;
                column.draw_channel_unfrozen = draw_channel_current + unfrozen_offset;
                if !no_clip {
                    draw_channel_current += 1;
                }
            } else {
                column.draw_channel_frozen = dummy;
                column.draw_channel_unfrozen = dummy;
            }
            column.draw_channel_current = column.draw_channel_frozen;
        }

        self.bg_clip_rect = self.inner_clip_rect;
        self.bg0_clip_rect_for_draw_cmd = env.cursor.clip_rect;
        self.bg2_clip_rect_for_draw_cmd = self.host_clip_rect;
        log::debug!(
            "table {:?}: {channels_total} draw channels ({channels_for_row} per row, dummy {:?})",
            self.id,
            self.dummy_draw_channel
        );
    }

    /// Regroup mergeable column channels so the splitter can coalesce them.
    ///
    /// Must run while channel 0 is current.
    pub(crate) fn merge_draw_channels(&mut self, splitter: &mut ChannelSplitter) {
        debug_assert_eq!(splitter.current(), 0, "merge needs channel 0 current");
        let has_freeze_v = self.freeze_rows_count > 0;
        let has_freeze_h = self.freeze_columns_count > 0;
        let channel_count = splitter.count();

        let mut groups: [MergeGroup; 4] = std::array::from_fn(|_| MergeGroup::new(channel_count));
        let mut any_group = false;
        let channels = splitter.channels_mut();

        // 1. Find channels holding a single command that fits inside its column.
        for column_n in 0..self.columns.len() {
            if !self.visible_mask_by_index.test(column_n) {
                continue;
            }
            // Freeze counts only enabled columns, same as the layout pass.
            let is_frozen_column = has_freeze_h
                && self.columns[column_n]
                    .index_within_enabled_set
                    .is_some_and(|n| n < self.freeze_columns_count);
            let column = &mut self.columns[column_n];
            let sub_count = if has_freeze_v { 2 } else { 1 };
            for sub_n in 0..sub_count {
                let channel_no = if sub_n == 0 {
                    column.draw_channel_frozen
                } else {
                    column.draw_channel_unfrozen
                };
                let channel = &mut channels[channel_no];
                if let Some(last) = channel.cmd_buffer.last() {
                    if last.elem_count == 0 && !last.is_callback() {
                        channel.cmd_buffer.pop();
                    }
                }
                if channel.cmd_buffer.len() != 1 {
                    continue;
                }

                if !column.flags.contains(ColumnFlags::NO_CLIP) {
                    let content_max_x = if !has_freeze_v {
                        column.content_max_x_unfrozen.max(column.content_max_x_headers_used)
                    } else if sub_n == 0 {
                        column.content_max_x_frozen.max(column.content_max_x_headers_used)
                    } else {
                        column.content_max_x_unfrozen
                    };
                    if content_max_x > column.clip_rect.max.x {
                        continue;
                    }
                }

                let group_n = usize::from(!is_frozen_column) + if has_freeze_v && sub_n == 0 { 0 } else { 2 };
                let group = &mut groups[group_n];
                group.channels.set(channel_no);
                group.count += 1;
                group.clip_rect.add_rect(&channel.cmd_buffer[0].clip_rect);
                any_group = true;
            }
            column.draw_channel_current = usize::MAX;
        }

        if !any_group {
            return;
        }

        // 2. Rewrite channels 2.. in group order, then whatever could not merge.
        let mut remaining = ColumnMask::with_capacity(channel_count);
        for n in LEADING_DRAW_CHANNELS..channel_count {
            remaining.set(n);
        }
        remaining.unset(self.bg2_draw_channel_unfrozen);
        debug_assert!(!has_freeze_v || self.bg2_draw_channel_unfrozen != CHANNEL_BG2_FROZEN);

        let host_rect = self.host_clip_rect;
        let mut scratch: Vec<DrawChannel> = Vec::with_capacity(channel_count - LEADING_DRAW_CHANNELS);
        for (group_n, group) in groups.iter().enumerate() {
            if group.count > 0 {
                let mut clip = group.clip_rect;

                // Reach out to the host edges, but never across a freeze line.
                if group_n & 1 == 0 || !has_freeze_h {
                    clip.min.x = clip.min.x.min(host_rect.min.x);
                }
                if group_n & 2 == 0 || !has_freeze_v {
                    clip.min.y = clip.min.y.min(host_rect.min.y);
                }
                if group_n & 1 != 0 {
                    clip.max.x = clip.max.x.max(host_rect.max.x);
                }
                if group_n & 2 != 0 && !self.flags.contains(TableFlags::NO_HOST_EXTEND_Y) {
                    clip.max.y = clip.max.y.max(host_rect.max.y);
                }

                for n in group.channels.iter() {
                    remaining.unset(n);
                    let mut channel = mem::take(&mut channels[n]);
                    debug_assert!(clip.contains_rect(&channel.cmd_buffer[0].clip_rect));
                    channel.cmd_buffer[0].clip_rect = clip;
                    scratch.push(channel);
                }
                stats::record_merge_group(group.count);
                log::trace!("table {:?}: merge group {group_n} of {} channels", self.id, group.count);
            }

            // Unfrozen bg2 sits between the frozen and unfrozen row groups.
            if group_n == 1 && has_freeze_v {
                scratch.push(mem::take(&mut channels[self.bg2_draw_channel_unfrozen]));
            }
        }
        for n in remaining.iter() {
            scratch.push(mem::take(&mut channels[n]));
        }
        debug_assert_eq!(scratch.len(), channel_count - LEADING_DRAW_CHANNELS);

        for (slot, channel) in channels[LEADING_DRAW_CHANNELS..].iter_mut().zip(scratch) {
            *slot = channel;
        }
    }

    /// Route drawing to the background channel shared by the whole row,
    /// clipped to the host rather than to the current column.
    pub(crate) fn push_background_channel(&mut self, env: &mut TableEnv) {
        self.host_backup_inner_clip_rect = env.cursor.clip_rect;
        set_clip_and_channel(
            env.draw_list,
            env.splitter,
            &mut env.cursor.clip_rect,
            self.bg2_clip_rect_for_draw_cmd,
            self.bg2_draw_channel_current,
        );
    }

    pub(crate) fn pop_background_channel(&mut self, env: &mut TableEnv) {
        let Some(column_n) = self.current_column else {
            return;
        };
        let channel = self.columns[column_n].draw_channel_current;
        set_clip_and_channel(
            env.draw_list,
            env.splitter,
            &mut env.cursor.clip_rect,
            self.host_backup_inner_clip_rect,
            channel,
        );
    }
}

/// Switch channel with `clip` already in place, so the switch itself decides
/// whether a new command is needed.
pub(crate) fn set_clip_and_channel(
    draw_list: &mut DrawList,
    splitter: &mut ChannelSplitter,
    cursor_clip: &mut Rect,
    clip: Rect,
    channel: usize,
) {
    *cursor_clip = clip;
    draw_list.set_clip_rect_before_set_channel(clip);
    splitter.set_current(draw_list, channel);
}
