use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MapError;

// Limits are in bytes of UTF-8.
pub const ROOM_NAME_LIMIT: usize = 49;
pub const CLUE_LIMIT: usize = 99;

/// The built-in mansion: (id, name, clue, left, right). Empty clue = none.
const MANSION: [(u32, &str, &str, Option<u32>, Option<u32>); 10] = [
    (0, "Hall de Entrada", "", Some(1), Some(2)),
    (1, "Cozinha", "", Some(3), Some(4)),
    (2, "Biblioteca", "Relógio de bolso quebrado", Some(5), Some(6)),
    (3, "Despensa", "Caixa vazia de charutos", None, None),
    (4, "Jardim de Inverno", "Luva de jardinagem suja", None, Some(9)),
    (5, "Escritório", "Óculos deixados sobre a mesa", None, Some(7)),
    (6, "Sala de Jantar", "", Some(8), None),
    (7, "Quarto Principal", "Carta anônima amassada", None, None),
    (8, "Varanda", "", None, None),
    (9, "Lavanderia", "", None, None),
];

/// Cuts `text` down to at most `limit` bytes, backing up to a char boundary.
pub fn truncate_bytes(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// One row of a layout table. The first row of a table is the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
}

pub fn mansion_layout() -> Vec<RoomSpec> {
    MANSION
        .iter()
        .map(|&(id, name, clue, left, right)| RoomSpec {
            id,
            name: name.to_string(),
            clue: (!clue.is_empty()).then(|| clue.to_string()),
            left,
            right,
        })
        .collect()
}

#[derive(Debug)]
pub struct Room {
    name: String,
    clue: String,
    left: Option<Box<Room>>,
    right: Option<Box<Room>>,
}

impl Room {
    pub fn new(name: &str, clue: &str) -> Self {
        Self {
            name: truncate_bytes(name, ROOM_NAME_LIMIT),
            clue: truncate_bytes(clue, CLUE_LIMIT),
            left: None,
            right: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clue(&self) -> Option<&str> {
        (!self.clue.is_empty()).then_some(self.clue.as_str())
    }

    /// Hands out the clue and leaves the room empty, so it is only found once.
    pub fn take_clue(&mut self) -> Option<String> {
        if self.clue.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.clue))
        }
    }

    pub fn child(&self, direction: Direction) -> Option<&Room> {
        match direction {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    fn child_mut(&mut self, direction: Direction) -> Option<&mut Room> {
        match direction {
            Direction::Left => self.left.as_deref_mut(),
            Direction::Right => self.right.as_deref_mut(),
        }
    }

    pub fn set_child(&mut self, direction: Direction, room: Room) {
        let slot = match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        };
        *slot = Some(Box::new(room));
    }

    pub fn is_dead_end(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl Drop for Room {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Room>> = self
            .left
            .take()
            .into_iter()
            .chain(self.right.take())
            .collect();
        while let Some(mut room) = pending.pop() {
            pending.extend(room.left.take());
            pending.extend(room.right.take());
        }
    }
}

/// The mansion as an owned binary tree of rooms, built once before play.
#[derive(Debug)]
pub struct RoomMap {
    root: Room,
    len: usize,
}

impl RoomMap {
    pub fn mansion() -> Result<Self, MapError> {
        Self::from_layout(&mansion_layout())
    }

    pub fn from_root(root: Room) -> Self {
        let mut map = Self { root, len: 0 };
        map.len = map.rooms().count();
        map
    }

    /// Builds the tree described by `layout`, rejecting anything that is not
    /// a single tree rooted at the first entry.
    pub fn from_layout(layout: &[RoomSpec]) -> Result<Self, MapError> {
        let root_spec = layout.first().ok_or(MapError::Empty)?;

        let mut by_id: HashMap<u32, &RoomSpec> = HashMap::with_capacity(layout.len());
        for spec in layout {
            if by_id.insert(spec.id, spec).is_some() {
                return Err(MapError::DuplicateId { id: spec.id });
            }
        }

        let mut parent_of: HashMap<u32, u32> = HashMap::new();
        for spec in layout {
            for child in [spec.left, spec.right].into_iter().flatten() {
                if !by_id.contains_key(&child) {
                    return Err(MapError::DanglingChild {
                        from: spec.id,
                        to: child,
                    });
                }
                if child == root_spec.id {
                    return Err(MapError::ChildIsRoot {
                        from: spec.id,
                        root: root_spec.id,
                    });
                }
                if let Some(&first_parent) = parent_of.get(&child) {
                    return Err(MapError::SharedChild {
                        id: child,
                        first_parent,
                        second_parent: spec.id,
                    });
                }
                parent_of.insert(child, spec.id);
            }
        }

        let mut reached = HashSet::new();
        let mut stack = vec![root_spec.id];
        while let Some(id) = stack.pop() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(spec) = by_id.get(&id) {
                stack.extend([spec.left, spec.right].into_iter().flatten());
            }
        }
        if reached.len() != layout.len() {
            let mut ids: Vec<u32> = layout
                .iter()
                .map(|spec| spec.id)
                .filter(|id| !reached.contains(id))
                .collect();
            ids.sort_unstable();
            return Err(MapError::Unreachable { ids });
        }

        let root = build_room(root_spec, &by_id)?;
        debug!(rooms = layout.len(), root = root.name(), "room map built");
        Ok(Self {
            root,
            len: layout.len(),
        })
    }

    pub fn root(&self) -> &Room {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Follows `path` from the root; `None` if a step has no room behind it.
    pub fn room_at(&self, path: &[Direction]) -> Option<&Room> {
        path.iter()
            .try_fold(&self.root, |room, &direction| room.child(direction))
    }

    pub fn room_at_mut(&mut self, path: &[Direction]) -> Option<&mut Room> {
        let mut room = &mut self.root;
        for &direction in path {
            room = room.child_mut(direction)?;
        }
        Some(room)
    }

    /// Rooms in depth-first order, left before right.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let room = stack.pop()?;
            stack.extend(room.right.as_deref());
            stack.extend(room.left.as_deref());
            Some(room)
        })
    }

    /// Renders the tree back into a layout table with ids in depth-first order.
    pub fn to_layout(&self) -> Vec<RoomSpec> {
        let mut layout = Vec::with_capacity(self.len);
        push_layout(&self.root, &mut layout);
        layout
    }
}

fn build_room(spec: &RoomSpec, by_id: &HashMap<u32, &RoomSpec>) -> Result<Room, MapError> {
    let mut room = Room::new(&spec.name, spec.clue.as_deref().unwrap_or_default());
    for (direction, child) in [(Direction::Left, spec.left), (Direction::Right, spec.right)] {
        if let Some(child) = child {
            let child_spec = by_id.get(&child).ok_or(MapError::DanglingChild {
                from: spec.id,
                to: child,
            })?;
            room.set_child(direction, build_room(child_spec, by_id)?);
        }
    }
    Ok(room)
}

fn push_layout(room: &Room, layout: &mut Vec<RoomSpec>) -> u32 {
    let id = layout.len() as u32;
    layout.push(RoomSpec {
        id,
        name: room.name.clone(),
        clue: room.clue().map(str::to_string),
        left: None,
        right: None,
    });
    let left = room.left.as_deref().map(|child| push_layout(child, layout));
    let right = room.right.as_deref().map(|child| push_layout(child, layout));
    let entry = &mut layout[id as usize];
    entry.left = left;
    entry.right = right;
    id
}
