/// Player intent, decoupled from the device that produced it.
/// Movement = continuous (held), actions = edge-triggered (fresh press).

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Offset delta for one step of `distance`. World +y is up.
    pub fn delta(self, distance: i64) -> (i64, i64) {
        match self {
            Direction::Up => (0, distance),
            Direction::Down => (0, distance.saturating_neg()),
            Direction::Left => (distance.saturating_neg(), 0),
            Direction::Right => (distance, 0),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Up => 0b0001,
            Direction::Down => 0b0010,
            Direction::Left => 0b0100,
            Direction::Right => 0b1000,
        }
    }
}

/// Set of held directions. Several may be held at once (diagonal movement).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn new() -> Self {
        DirectionSet(0)
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn remove(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::new();
        for d in iter {
            set.insert(d);
        }
        set
    }
}

/// Discrete one-shot actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Mine,
    Build,
    Home,
}

/// Everything the devices produced this frame.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub held: DirectionSet,
    pub actions: Vec<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_use_up_positive() {
        assert_eq!(Direction::Up.delta(10), (0, 10));
        assert_eq!(Direction::Down.delta(10), (0, -10));
        assert_eq!(Direction::Left.delta(10), (-10, 0));
        assert_eq!(Direction::Right.delta(10), (10, 0));
    }

    #[test]
    fn set_tracks_press_and_release() {
        let mut s = DirectionSet::new();
        assert!(s.is_empty());
        s.insert(Direction::Up);
        s.insert(Direction::Left);
        s.insert(Direction::Up);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![Direction::Up, Direction::Left]);
        s.remove(Direction::Up);
        assert!(!s.contains(Direction::Up));
        assert!(s.contains(Direction::Left));
        s.remove(Direction::Down);
        assert_eq!(s.iter().count(), 1);
    }

    #[test]
    fn collects_from_iterator() {
        let s: DirectionSet = [Direction::Right, Direction::Down].into_iter().collect();
        assert!(s.contains(Direction::Right) && s.contains(Direction::Down));
        assert!(!s.contains(Direction::Up));
    }
}
