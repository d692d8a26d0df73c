// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Simulated shell for tests: a window tree, one tray toolbar and a foreign
//! process whose memory is tracked allocation by allocation.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::host::{Host, ProcessHandle, RemoteAddr, ToolbarMessage};
use crate::locator::TRAY_TOOLBAR_CHAIN;
use crate::types::{ButtonDescriptor, Rect, ScreenRect, TargetArch, WindowId};

pub const BUTTON_W: i32 = 24;
pub const BUTTON_H: i32 = 40;

const DECOY: WindowId = WindowId(0x10);

pub struct SimButton {
    pub command_id: i32,
    pub text: String,
    pub rect: Rect,
}

struct SimWindow {
    id: WindowId,
    parent: Option<WindowId>,
    class: String,
}

struct State {
    windows: Vec<SimWindow>,
    toolbar: WindowId,
    origin: Option<ScreenRect>,
    buttons: Vec<SimButton>,
    pid: u32,
    arch: TargetArch,
    arch_hidden: bool,
    page: usize,
    deny_open: bool,
    deny_alloc: bool,
    fail_reads: bool,
    broken_buttons: HashSet<usize>,
    broken_rects: bool,
    // text the control holds by the time it writes; `None` refuses the write
    text_on_write: HashMap<i32, Option<String>>,
    next_handle: isize,
    handles: HashSet<isize>,
    next_addr: usize,
    memory: HashMap<usize, Vec<u8>>,
    frees: usize,
    overflows: usize,
}

pub struct SimHost {
    state: RefCell<State>,
}

impl SimHost {
    /// Shell_TrayWnd > TrayNotifyWnd > SysPager > ToolbarWindow32 with one
    /// button per label, laid out left to right.
    pub fn with_tray(labels: &[&str]) -> Self {
        let mut windows = Vec::new();
        // a decoy top-level toolbar that must not be picked up
        windows.push(SimWindow { id: DECOY, parent: None, class: "ToolbarWindow32".into() });
        let mut parent = None;
        for (i, class) in TRAY_TOOLBAR_CHAIN.iter().enumerate() {
            let id = WindowId(0x100 + i as isize);
            windows.push(SimWindow { id, parent, class: class.to_string() });
            parent = Some(id);
        }
        let toolbar = parent.unwrap();

        let buttons = labels
            .iter()
            .enumerate()
            .map(|(i, text)| SimButton {
                command_id: 100 + i as i32,
                text: text.to_string(),
                rect: Rect {
                    left: BUTTON_W * i as i32,
                    top: 0,
                    right: BUTTON_W * (i as i32 + 1),
                    bottom: BUTTON_H,
                },
            })
            .collect();

        Self {
            state: RefCell::new(State {
                windows,
                toolbar,
                origin: Some(ScreenRect { left: 1600, top: 1040, right: 1800, bottom: 1080 }),
                buttons,
                pid: 4242,
                arch: TargetArch::X64,
                arch_hidden: false,
                page: 4096,
                deny_open: false,
                deny_alloc: false,
                fail_reads: false,
                broken_buttons: HashSet::new(),
                broken_rects: false,
                text_on_write: HashMap::new(),
                next_handle: 0x500,
                handles: HashSet::new(),
                next_addr: 0x7ff0_0000,
                memory: HashMap::new(),
                frees: 0,
                overflows: 0,
            }),
        }
    }

    // ── Knobs ───────────────────────────────────────

    pub fn toolbar(&self) -> WindowId {
        self.state.borrow().toolbar
    }

    pub fn shell_pid(&self) -> u32 {
        self.state.borrow().pid
    }

    pub fn origin(&self) -> ScreenRect {
        self.state.borrow().origin.unwrap_or_default()
    }

    pub fn set_origin(&self, origin: Option<ScreenRect>) {
        self.state.borrow_mut().origin = origin;
    }

    pub fn set_arch(&self, arch: TargetArch) {
        self.state.borrow_mut().arch = arch;
    }

    pub fn hide_arch(&self) {
        self.state.borrow_mut().arch_hidden = true;
    }

    pub fn set_page_size(&self, page: usize) {
        self.state.borrow_mut().page = page;
    }

    pub fn deny_open(&self) {
        self.state.borrow_mut().deny_open = true;
    }

    pub fn deny_alloc(&self) {
        self.state.borrow_mut().deny_alloc = true;
    }

    pub fn fail_reads(&self) {
        self.state.borrow_mut().fail_reads = true;
    }

    pub fn break_button(&self, index: usize) {
        self.state.borrow_mut().broken_buttons.insert(index);
    }

    pub fn break_rects(&self) {
        self.state.borrow_mut().broken_rects = true;
    }

    /// Text of `command_id` changes between the length query and the write.
    pub fn change_text_on_write(&self, command_id: i32, text: &str) {
        self.state.borrow_mut().text_on_write.insert(command_id, Some(text.to_string()));
    }

    /// The writing TB_GETBUTTONTEXTW for `command_id` answers -1.
    pub fn refuse_text_write(&self, command_id: i32) {
        self.state.borrow_mut().text_on_write.insert(command_id, None);
    }

    pub fn remove_class(&self, class: &str) {
        self.state.borrow_mut().windows.retain(|w| w.class != class || w.id == DECOY);
    }

    // ── Observations ────────────────────────────────

    pub fn live_allocations(&self) -> usize {
        self.state.borrow().memory.len()
    }

    pub fn open_handles(&self) -> usize {
        self.state.borrow().handles.len()
    }

    pub fn frees(&self) -> usize {
        self.state.borrow().frees
    }

    pub fn overflows(&self) -> usize {
        self.state.borrow().overflows
    }

    /// What the control itself knows about button `index`, without IPC.
    pub fn direct_button(&self, index: usize) -> ButtonDescriptor {
        let s = self.state.borrow();
        let b = &s.buttons[index];
        ButtonDescriptor {
            index,
            command_id: b.command_id,
            bitmap: index as i32,
            state: 0x04,
            style: 0x00,
            data: 0xa000 + index as u64,
            string: -1,
        }
    }

    pub fn direct_rect(&self, command_id: i32) -> Rect {
        let s = self.state.borrow();
        s.buttons
            .iter()
            .find(|b| b.command_id == command_id)
            .map(|b| b.rect)
            .unwrap_or_default()
    }

    fn encode_button(&self, index: usize) -> Vec<u8> {
        let d = self.direct_button(index);
        let arch = self.state.borrow().arch;
        let mut out = vec![0u8; arch.descriptor_size()];
        out[0..4].copy_from_slice(&d.bitmap.to_le_bytes());
        out[4..8].copy_from_slice(&d.command_id.to_le_bytes());
        out[8] = d.state;
        out[9] = d.style;
        match arch {
            TargetArch::X86 => {
                out[12..16].copy_from_slice(&(d.data as u32).to_le_bytes());
                out[16..20].copy_from_slice(&(d.string as i32).to_le_bytes());
            }
            TargetArch::X64 => {
                out[16..24].copy_from_slice(&d.data.to_le_bytes());
                out[24..32].copy_from_slice(&d.string.to_le_bytes());
            }
        }
        out
    }

    /// Remote write as the control would do it: no bounds check of its own.
    fn write_remote(&self, lparam: isize, bytes: &[u8]) {
        let mut s = self.state.borrow_mut();
        let Some(region) = s.memory.get_mut(&(lparam as usize)) else {
            return;
        };
        let n = bytes.len().min(region.len());
        region[..n].copy_from_slice(&bytes[..n]);
        if bytes.len() > n {
            s.overflows += 1;
        }
    }
}

impl Host for SimHost {
    fn find_child(&self, parent: Option<WindowId>, class: &str) -> Option<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.parent == parent && w.class == class)
            .map(|w| w.id)
    }

    fn window_rect(&self, window: WindowId) -> Option<ScreenRect> {
        let s = self.state.borrow();
        if window != s.toolbar {
            return None;
        }
        s.origin
    }

    fn window_process_id(&self, window: WindowId) -> Option<u32> {
        let s = self.state.borrow();
        s.windows.iter().any(|w| w.id == window).then_some(s.pid)
    }

    fn page_size(&self) -> usize {
        self.state.borrow().page
    }

    fn send_toolbar_message(
        &self,
        window: WindowId,
        message: ToolbarMessage,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        if window != self.toolbar() {
            return 0;
        }
        match message {
            ToolbarMessage::ButtonCount => self.state.borrow().buttons.len() as isize,
            ToolbarMessage::GetButton => {
                {
                    let s = self.state.borrow();
                    if lparam == 0 || wparam >= s.buttons.len() || s.broken_buttons.contains(&wparam) {
                        return 0;
                    }
                }
                let bytes = self.encode_button(wparam);
                self.write_remote(lparam, &bytes);
                1
            }
            ToolbarMessage::GetButtonText => {
                let text = {
                    let s = self.state.borrow();
                    let id = wparam as i32;
                    let Some(b) = s.buttons.iter().find(|b| b.command_id == id) else {
                        return -1;
                    };
                    match s.text_on_write.get(&id) {
                        Some(Some(changed)) if lparam != 0 => changed.clone(),
                        Some(None) if lparam != 0 => return -1,
                        _ => b.text.clone(),
                    }
                };
                let units: Vec<u16> = text.encode_utf16().collect();
                if lparam != 0 {
                    let bytes: Vec<u8> = units
                        .iter()
                        .chain(std::iter::once(&0))
                        .flat_map(|u| u.to_le_bytes())
                        .collect();
                    self.write_remote(lparam, &bytes);
                }
                units.len() as isize
            }
            ToolbarMessage::GetRect => {
                let rect = {
                    let s = self.state.borrow();
                    if lparam == 0 || s.broken_rects {
                        return 0;
                    }
                    match s.buttons.iter().find(|b| b.command_id == wparam as i32) {
                        Some(b) => b.rect,
                        None => return 0,
                    }
                };
                let bytes: Vec<u8> = [rect.left, rect.top, rect.right, rect.bottom]
                    .iter()
                    .flat_map(|v| v.to_le_bytes())
                    .collect();
                self.write_remote(lparam, &bytes);
                1
            }
        }
    }

    fn open_process(&self, pid: u32) -> Option<ProcessHandle> {
        let mut s = self.state.borrow_mut();
        if s.deny_open || pid != s.pid {
            return None;
        }
        let h = s.next_handle;
        s.next_handle += 4;
        s.handles.insert(h);
        Some(ProcessHandle(h))
    }

    fn close_process(&self, process: ProcessHandle) {
        let removed = self.state.borrow_mut().handles.remove(&process.0);
        assert!(removed, "process handle {:#x} closed twice", process.0);
    }

    fn process_arch(&self, process: ProcessHandle) -> Option<TargetArch> {
        let s = self.state.borrow();
        if s.arch_hidden || !s.handles.contains(&process.0) {
            return None;
        }
        Some(s.arch)
    }

    fn alloc_remote(&self, process: ProcessHandle, size: usize) -> Option<RemoteAddr> {
        let mut s = self.state.borrow_mut();
        if s.deny_alloc || !s.handles.contains(&process.0) {
            return None;
        }
        let addr = s.next_addr;
        s.next_addr += 0x1_0000;
        s.memory.insert(addr, vec![0xcd; size]);
        Some(RemoteAddr(addr))
    }

    fn free_remote(&self, process: ProcessHandle, addr: RemoteAddr) {
        let mut s = self.state.borrow_mut();
        assert!(s.handles.contains(&process.0), "free through a closed handle");
        let freed = s.memory.remove(&addr.0).is_some();
        assert!(freed, "remote region {:#x} freed twice", addr.0);
        s.frees += 1;
    }

    fn read_remote(&self, process: ProcessHandle, addr: RemoteAddr, buf: &mut [u8]) -> bool {
        let s = self.state.borrow();
        if s.fail_reads || !s.handles.contains(&process.0) {
            return false;
        }
        match s.memory.get(&addr.0) {
            Some(region) if buf.len() <= region.len() => {
                buf.copy_from_slice(&region[..buf.len()]);
                true
            }
            _ => false,
        }
    }
}
