//! Draw channels.
//!
//! A [`ChannelSplitter`] divides one [`DrawList`] into independent command
//! streams that can be written out of order and stitched back together.
//! Vertices stay in the host list; only commands and indices move between
//! channels, and switching channels swaps buffers instead of copying them.

use std::mem;

use super::{DrawCmd, DrawIdx, DrawList};
use crate::stats;

#[derive(Debug, Clone, Default)]
pub struct DrawChannel {
    pub cmd_buffer: Vec<DrawCmd>,
    pub idx_buffer: Vec<DrawIdx>,
}

impl DrawChannel {
    fn clear(&mut self) {
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
    }
}

/// Splits a draw list into channels and merges them back.
///
/// While split, the host list holds the buffers of the current channel and
/// the current channel's slot holds spare buffers. Channel slots are kept
/// between uses so their allocations are recycled.
#[derive(Debug, Default)]
pub struct ChannelSplitter {
    channels: Vec<DrawChannel>,
    current: usize,
    count: usize,
}

impl ChannelSplitter {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            current: 0,
            count: 1,
        }
    }

    pub fn count(&self) -> usize {
        self.count.max(1)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_split(&self) -> bool {
        self.count > 1
    }

    /// Release the channel buffers.
    pub fn clear_free_memory(&mut self) {
        assert!(!self.is_split(), "cannot free a splitter while split");
        self.channels = Vec::new();
        self.current = 0;
        self.count = 1;
    }

    /// Stored buffers of channel `idx`. Not meaningful for the current channel,
    /// whose buffers live in the host draw list.
    pub fn channel(&self, idx: usize) -> &DrawChannel {
        &self.channels[idx]
    }

    /// The stored channel slots of the active split.
    pub(crate) fn channels_mut(&mut self) -> &mut [DrawChannel] {
        let count = self.count;
        &mut self.channels[..count]
    }

    /// Partition `draw_list` into `count` channels. Channel 0 continues the
    /// host's existing stream; the other channels start empty.
    pub fn split(&mut self, count: usize) {
        assert!(count >= 1, "a split needs at least one channel");
        assert!(
            self.current == 0 && self.count <= 1,
            "nested channel splitting is not supported, use a separate splitter"
        );
        if self.channels.len() < count {
            self.channels.resize_with(count, DrawChannel::default);
        }
        self.count = count;

        // Slot 0 stores the spare buffers while channel 0 is current.
        for channel in &mut self.channels[..count] {
            channel.clear();
        }
        stats::record_split(count);
    }

    /// Make channel `idx` the target of subsequent draw calls.
    pub fn set_current(&mut self, draw_list: &mut DrawList, idx: usize) {
        assert!(
            idx < self.count(),
            "channel {idx} out of range ({} channels)",
            self.count()
        );
        if self.current == idx {
            return;
        }

        let current = &mut self.channels[self.current];
        mem::swap(&mut current.cmd_buffer, &mut draw_list.cmd_buffer);
        mem::swap(&mut current.idx_buffer, &mut draw_list.idx_buffer);
        self.current = idx;
        let next = &mut self.channels[idx];
        mem::swap(&mut next.cmd_buffer, &mut draw_list.cmd_buffer);
        mem::swap(&mut next.idx_buffer, &mut draw_list.idx_buffer);

        // Re-stamp or open a command if the channel's tail does not match
        // the current clip rect, texture and vertex offset.
        let header = draw_list.cmd_header;
        let needs_cmd = match draw_list.cmd_buffer.last_mut() {
            None => true,
            Some(cmd) if cmd.elem_count == 0 && !cmd.is_callback() => {
                cmd.set_header(&header);
                false
            }
            Some(cmd) => cmd.is_callback() || !cmd.header_matches(&header),
        };
        if needs_cmd {
            draw_list.add_draw_cmd();
        }
    }

    /// Flatten all channels back into the host in channel order.
    ///
    /// Index offsets are rebuilt, the tail command of one channel is folded
    /// into the head command of the next when their headers match, and the
    /// host is left with a trailing non-callback command for the current header.
    pub fn merge(&mut self, draw_list: &mut DrawList) {
        if self.count <= 1 {
            return;
        }

        self.set_current(draw_list, 0);
        draw_list.pop_unused_draw_cmd();

        let cmds_before = draw_list.cmd_buffer.len()
            + self.channels[1..self.count]
                .iter()
                .map(|ch| ch.cmd_buffer.len())
                .sum::<usize>();

        let mut new_cmd_count = 0;
        let mut new_idx_count = 0;
        let mut idx_offset = draw_list
            .cmd_buffer
            .last()
            .map(|cmd| cmd.idx_offset + cmd.elem_count)
            .unwrap_or(0);

        // The command the next channel's head may merge into: either the
        // host's tail or the tail of the last non-empty channel.
        #[derive(Clone, Copy)]
        enum Tail {
            Host,
            Channel(usize),
        }
        let mut tail = if draw_list.cmd_buffer.is_empty() {
            None
        } else {
            Some(Tail::Host)
        };

        for i in 1..self.count {
            let ch = &mut self.channels[i];
            if let Some(last) = ch.cmd_buffer.last() {
                if last.elem_count == 0 && !last.is_callback() {
                    ch.cmd_buffer.pop();
                }
            }

            if let (Some(t), Some(next)) = (tail, self.channels[i].cmd_buffer.first().copied()) {
                let last_cmd = match t {
                    Tail::Host => draw_list.cmd_buffer.last_mut(),
                    Tail::Channel(j) => self.channels[j].cmd_buffer.last_mut(),
                };
                if let Some(last_cmd) = last_cmd {
                    if last_cmd.header_matches(&next.header())
                        && !last_cmd.is_callback()
                        && !next.is_callback()
                    {
                        last_cmd.elem_count += next.elem_count;
                        idx_offset += next.elem_count;
                        self.channels[i].cmd_buffer.remove(0);
                    }
                }
            }

            let ch = &mut self.channels[i];
            if !ch.cmd_buffer.is_empty() {
                tail = Some(Tail::Channel(i));
            }
            new_cmd_count += ch.cmd_buffer.len();
            new_idx_count += ch.idx_buffer.len();
            for cmd in &mut ch.cmd_buffer {
                cmd.idx_offset = idx_offset;
                idx_offset += cmd.elem_count;
            }
        }

        draw_list.cmd_buffer.reserve(new_cmd_count);
        draw_list.idx_buffer.reserve(new_idx_count);
        for ch in &self.channels[1..self.count] {
            draw_list.cmd_buffer.extend_from_slice(&ch.cmd_buffer);
            draw_list.idx_buffer.extend_from_slice(&ch.idx_buffer);
        }

        if draw_list
            .cmd_buffer
            .last()
            .map_or(true, |cmd| cmd.is_callback())
        {
            draw_list.add_draw_cmd();
        }
        let header = draw_list.cmd_header;
        let needs_cmd = match draw_list.cmd_buffer.last_mut() {
            Some(cmd) if cmd.elem_count == 0 => {
                cmd.set_header(&header);
                false
            }
            Some(cmd) => !cmd.header_matches(&header),
            None => true,
        };
        if needs_cmd {
            draw_list.add_draw_cmd();
        }

        stats::record_merge(cmds_before, draw_list.cmd_buffer.len());
        log::trace!(
            "merged {} channels: {} -> {} commands",
            self.count,
            cmds_before,
            draw_list.cmd_buffer.len()
        );
        self.count = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Rect};

    fn quad(dl: &mut DrawList, x: f32) {
        dl.add_rect_filled(Rect::new(x, 0.0, x + 4.0, 4.0), Color::WHITE);
    }

    #[test]
    fn test_merge_untouched_split_is_identity() {
        let mut dl = DrawList::new();
        dl.push_clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0), false);
        quad(&mut dl, 0.0);
        quad(&mut dl, 10.0);
        let cmds = dl.cmd_buffer.clone();
        let idx = dl.idx_buffer.clone();

        let mut splitter = ChannelSplitter::new();
        splitter.split(4);
        splitter.merge(&mut dl);

        assert_eq!(dl.cmd_buffer, cmds);
        assert_eq!(
            bytemuck::cast_slice::<DrawIdx, u8>(&dl.idx_buffer),
            bytemuck::cast_slice::<DrawIdx, u8>(&idx)
        );
    }

    #[test]
    fn test_channels_are_written_out_of_order() {
        let mut dl = DrawList::new();
        let mut splitter = ChannelSplitter::new();
        splitter.split(3);
        splitter.set_current(&mut dl, 2);
        quad(&mut dl, 20.0);
        splitter.set_current(&mut dl, 1);
        quad(&mut dl, 10.0);
        splitter.set_current(&mut dl, 0);
        quad(&mut dl, 0.0);
        splitter.merge(&mut dl);

        // Same header everywhere: everything coalesces into one command.
        assert_eq!(dl.visible_cmd_count(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 18);
        // Channel order decides draw order: x=0, then x=10, then x=20.
        let first_vtx_of = |n: usize| dl.vtx_buffer[dl.idx_buffer[n * 6] as usize].pos[0];
        assert_eq!(first_vtx_of(0), 0.0);
        assert_eq!(first_vtx_of(1), 10.0);
        assert_eq!(first_vtx_of(2), 20.0);
    }

    #[test]
    fn test_different_clip_rects_stay_separate() {
        let mut dl = DrawList::new();
        dl.push_clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0), false);
        let mut splitter = ChannelSplitter::new();
        splitter.split(3);
        for ch in 1..3 {
            dl.set_clip_rect_before_set_channel(Rect::new(ch as f32 * 10.0, 0.0, 100.0, 100.0));
            splitter.set_current(&mut dl, ch);
            quad(&mut dl, ch as f32 * 10.0);
        }
        dl.set_clip_rect_before_set_channel(Rect::new(0.0, 0.0, 100.0, 100.0));
        splitter.merge(&mut dl);

        assert_eq!(dl.visible_cmd_count(), 2);
        let offsets: Vec<u32> = dl.cmd_buffer.iter().map(|c| c.idx_offset).collect();
        assert_eq!(&offsets[..2], &[0, 6]);
        // Trailing command matches the host header again.
        let last = dl.cmd_buffer.last().copied();
        assert!(last.is_some_and(|c| c.header_matches(dl.header())));
    }

    #[test]
    fn test_callback_blocks_coalescing() {
        let mut dl = DrawList::new();
        let mut splitter = ChannelSplitter::new();
        splitter.split(2);
        quad(&mut dl, 0.0);
        dl.add_callback(crate::renderer::DrawCallback { id: 1, data: 0 });
        splitter.set_current(&mut dl, 1);
        quad(&mut dl, 10.0);
        splitter.merge(&mut dl);
        assert!(dl.cmd_buffer.iter().any(|c| c.is_callback()));
        assert_eq!(dl.visible_cmd_count(), 3);
        assert!(!dl.cmd_buffer.last().is_some_and(|c| c.is_callback()));
    }

    #[test]
    #[should_panic(expected = "nested channel splitting")]
    fn test_nested_split_panics() {
        let mut dl = DrawList::new();
        let mut splitter = ChannelSplitter::new();
        splitter.split(2);
        splitter.split(2);
    }

    #[test]
    fn test_splitter_is_reusable() {
        let mut dl = DrawList::new();
        let mut splitter = ChannelSplitter::new();
        for _ in 0..3 {
            splitter.split(2);
            splitter.set_current(&mut dl, 1);
            quad(&mut dl, 0.0);
            splitter.merge(&mut dl);
            assert!(!splitter.is_split());
        }
        assert_eq!(dl.visible_cmd_count(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 18);
    }
}
