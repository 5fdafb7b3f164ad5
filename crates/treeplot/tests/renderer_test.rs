use pretty_assertions::assert_eq;
use treeplot::{LayoutConfig, NodeRenderer, Order, SearchTree};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Create(u32, i32),
    Label(u32, i32),
    Position(u32, f64, f64),
    Destroy(u32),
}

/// Hands out sequential handles and records every call it receives.
#[derive(Default)]
struct Recorder {
    next: u32,
    calls: Vec<Call>,
}

impl Recorder {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl NodeRenderer<i32> for Recorder {
    type Handle = u32;

    fn create(&mut self, key: &i32) -> u32 {
        let handle = self.next;
        self.next += 1;
        self.calls.push(Call::Create(handle, *key));
        handle
    }

    fn set_label(&mut self, handle: &mut u32, key: &i32) {
        self.calls.push(Call::Label(*handle, *key));
    }

    fn set_position(&mut self, handle: &mut u32, x: f64, y: f64) {
        self.calls.push(Call::Position(*handle, x, y));
    }

    fn destroy(&mut self, handle: u32) {
        self.calls.push(Call::Destroy(handle));
    }
}

fn recorded_tree(keys: &[i32]) -> SearchTree<i32, Recorder> {
    let mut tree = SearchTree::with_renderer(LayoutConfig::default(), Recorder::default());
    for &key in keys {
        tree.insert(key).unwrap();
    }
    tree
}

#[test]
fn insert_creates_one_handle_per_key() {
    let mut tree = recorded_tree(&[10, 5]);
    assert!(tree.insert(5).is_err());
    assert_eq!(
        tree.renderer_mut().take(),
        [Call::Create(0, 10), Call::Create(1, 5)]
    );
}

#[test]
fn mutations_do_not_move_anything_until_relayout() {
    let mut tree = recorded_tree(&[10, 5, 15]);
    tree.remove(&5).unwrap();
    let calls = tree.renderer_mut().take();
    assert!(!calls.iter().any(|c| matches!(c, Call::Position(..))));

    tree.relayout();
    let calls = tree.renderer_mut().take();
    assert_eq!(calls, [Call::Position(0, 0.0, 0.0), Call::Position(2, 22.0, 28.0)]);
}

#[test]
fn two_child_removal_relabels_then_destroys_successor() {
    let mut tree = recorded_tree(&[10, 5, 15, 12, 20]);
    tree.renderer_mut().take();
    assert_eq!(tree.remove(&10), Ok(10));
    // Handle 0 is the root, handle 3 belonged to 12.
    assert_eq!(tree.renderer_mut().take(), [Call::Label(0, 12), Call::Destroy(3)]);
    let root = tree.root().unwrap();
    assert_eq!(*tree.map()[root].handle(), 0);
}

#[test]
fn centered_parent_is_placed_twice() {
    let mut tree = recorded_tree(&[10, 5, 15, 12]);
    tree.config_mut().center_parent = true;
    tree.renderer_mut().take();
    tree.relayout();
    let root_moves: Vec<_> = tree
        .renderer_mut()
        .take()
        .into_iter()
        .filter(|c| matches!(c, Call::Position(0, ..)))
        .collect();
    assert_eq!(
        root_moves,
        [Call::Position(0, 33.0, 0.0), Call::Position(0, 49.5, 0.0)]
    );
}

#[test]
fn clear_destroys_every_handle() {
    let mut tree = recorded_tree(&[2, 1, 3]);
    tree.renderer_mut().take();
    tree.clear();
    let mut destroyed: Vec<_> = tree
        .renderer_mut()
        .take()
        .into_iter()
        .filter_map(|c| match c {
            Call::Destroy(h) => Some(h),
            _ => None,
        })
        .collect();
    destroyed.sort();
    assert_eq!(destroyed, [0, 1, 2]);
    assert!(tree.is_empty());
}

#[test]
fn round_trip_through_public_api() {
    let mut tree = SearchTree::new();
    for key in [8, 3, 10, 1, 6, 14, 4, 7, 13] {
        tree.insert(key).unwrap();
    }
    assert!(tree.search(&6).found);
    assert_eq!(tree.remove(&6), Ok(6));
    assert!(!tree.search(&6).found);
    assert_eq!(
        tree.keys(Order::InOrder).into_iter().copied().collect::<Vec<_>>(),
        [1, 3, 4, 7, 8, 10, 13, 14]
    );
    tree.relayout();
    let before: Vec<_> = tree.traverse(Order::PreOrder).map(|n| tree.map()[n].position()).collect();
    tree.relayout();
    let after: Vec<_> = tree.traverse(Order::PreOrder).map(|n| tree.map()[n].position()).collect();
    assert_eq!(before, after);
}
