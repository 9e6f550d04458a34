// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::Regex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(\d+)\s+(.+)$").expect("constant regex pattern is valid")
});

/// Parent → children map plus each process's command line.
#[derive(Debug, Clone, Default)]
pub struct ProcessTree {
    children: HashMap<u32, Vec<u32>>,
    commands: HashMap<u32, String>,
}

impl ProcessTree {
    /// Parse `ps -ax -o pid= -o ppid= -o command=` output.
    ///
    /// Lines that do not look like `pid ppid command` are skipped.
    pub fn parse(listing: &str) -> Self {
        let mut tree = Self::default();
        for line in listing.lines() {
            let Some(caps) = PS_LINE.captures(line.trim()) else {
                continue;
            };
            let (Ok(pid), Ok(ppid)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
                continue;
            };
            tree.insert(pid, ppid, caps[3].trim());
        }
        tree
    }

    pub fn insert(&mut self, pid: u32, ppid: u32, command: impl Into<String>) {
        self.commands.insert(pid, command.into());
        self.children.entry(ppid).or_default().push(pid);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn command(&self, pid: u32) -> Option<&str> {
        self.commands.get(&pid).map(String::as_str)
    }

    pub fn children(&self, pid: u32) -> &[u32] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Breadth-first search from `pid` (inclusive) for a process whose
    /// command line runs the agent executable.
    pub fn has_agent_descendant(&self, pid: u32, matcher: &AgentMatcher) -> bool {
        let mut queue = VecDeque::from([pid]);
        let mut visited = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if self.command(current).is_some_and(|cmd| matcher.matches(cmd)) {
                return true;
            }
            queue.extend(self.children(current));
        }
        false
    }
}

/// Matches command lines that execute the agent binary itself.
///
/// The executable must appear as a bare command or a whole path component
/// followed by whitespace or end of line, so `agent-viewer --claude` or
/// `vim claude.md` do not count.
#[derive(Debug, Clone)]
pub struct AgentMatcher {
    pattern: Regex,
}

impl AgentMatcher {
    pub fn new(process_name: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?:^|/){}(?:\s|$)",
            regex::escape(process_name)
        ))?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, command_line: &str) -> bool {
        self.pattern.is_match(command_line)
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
