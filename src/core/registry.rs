use crate::client::Client;
use crate::util::BuildIdHasher;

use winsys::window::Window;

use std::collections::HashMap;

/// Owns every managed client, kept in two parallel orderings over the
/// same membership: the attach order (newest first, used for cycling
/// and workspace iteration) and the stacking order (front-to-back
/// screen depth, front being the most recently raised).
pub struct Registry {
    clients: HashMap<Window, Client, BuildIdHasher>,
    attach_order: Vec<Window>,
    stacking_order: Vec<Window>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::default(),
            attach_order: Vec::new(),
            stacking_order: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[inline]
    pub fn contains(
        &self,
        window: Window,
    ) -> bool {
        self.clients.contains_key(&window)
    }

    /// Inserts at the head of the attach order. A window that is
    /// already present is left untouched.
    pub fn attach(
        &mut self,
        client: Client,
    ) {
        let window = client.window();

        if self.clients.contains_key(&window) {
            return;
        }

        self.clients.insert(window, client);
        self.attach_order.insert(0, window);
    }

    /// Inserts at the head of the stacking order.
    pub fn attach_stack(
        &mut self,
        window: Window,
    ) {
        if self.stacking_order.contains(&window) {
            return;
        }

        self.stacking_order.insert(0, window);
    }

    /// Removes from the attach order and releases the client record;
    /// a no-op for an absent handle.
    pub fn detach(
        &mut self,
        window: Window,
    ) -> Option<Client> {
        self.attach_order.retain(|&w| w != window);
        self.clients.remove(&window)
    }

    /// Removes from the stacking order; a no-op for an absent handle.
    pub fn detach_stack(
        &mut self,
        window: Window,
    ) {
        self.stacking_order.retain(|&w| w != window);
    }

    #[inline]
    pub fn find(
        &self,
        window: Window,
    ) -> Option<&Client> {
        self.clients.get(&window)
    }

    #[inline]
    pub fn attach_order(&self) -> &[Window] {
        &self.attach_order
    }

    #[inline]
    pub fn stacking_order(&self) -> &[Window] {
        &self.stacking_order
    }

    /// Moves a window to the front of the stacking order.
    pub fn raise_to_top(
        &mut self,
        window: Window,
    ) {
        if let Some(index) = self.stacking_order.iter().position(|&w| w == window) {
            self.stacking_order.remove(index);
            self.stacking_order.insert(0, window);
        }
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.attach_order
            .iter()
            .filter_map(move |window| self.clients.get(window))
    }

    /// Clients visible on the given workspace, in attach order.
    pub fn visible(
        &self,
        workspace: usize,
    ) -> impl Iterator<Item = &Client> {
        self.clients()
            .filter(move |client| client.is_visible_on(workspace))
    }

    /// The deterministic focus target after the given window goes
    /// away: its nearest predecessor in attach order that satisfies
    /// the predicate, else its nearest such successor, else none.
    pub fn focus_successor_of(
        &self,
        window: Window,
        predicate: impl Fn(&Client) -> bool,
    ) -> Option<Window> {
        let index = self.attach_order.iter().position(|&w| w == window)?;

        let eligible = |&&candidate: &&Window| {
            candidate != window
                && self.clients.get(&candidate).map_or(false, |c| predicate(c))
        };

        self.attach_order[..index]
            .iter()
            .rev()
            .find(eligible)
            .or_else(|| self.attach_order[index + 1..].iter().find(eligible))
            .copied()
    }

    /// The most recently focused client satisfying the predicate, per
    /// the stacking order.
    pub fn most_recent(
        &self,
        predicate: impl Fn(&Client) -> bool,
    ) -> Option<Window> {
        self.stacking_order
            .iter()
            .find(|&&window| self.clients.get(&window).map_or(false, |c| predicate(c)))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winsys::geometry::Region;

    fn client(window: Window) -> Client {
        Client::new(window, "", 0, Region::new(0, 0, 100, 100), None)
    }

    fn registry_with(windows: &[Window]) -> Registry {
        let mut registry = Registry::new();

        for &window in windows {
            registry.attach(client(window));
            registry.attach_stack(window);
        }

        registry
    }

    #[test]
    fn attaching_prepends_to_both_orders() {
        let registry = registry_with(&[10, 20, 30]);

        assert_eq!(registry.attach_order(), &[30, 20, 10]);
        assert_eq!(registry.stacking_order(), &[30, 20, 10]);
    }

    #[test]
    fn attaching_a_duplicate_is_a_noop() {
        let mut registry = registry_with(&[10, 20]);

        registry.attach(client(10));
        registry.attach_stack(10);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.attach_order(), &[20, 10]);
        assert_eq!(registry.stacking_order(), &[20, 10]);
    }

    #[test]
    fn both_orders_remain_permutations_of_the_same_set() {
        let mut registry = registry_with(&[10, 20, 30, 40]);

        registry.raise_to_top(10);
        registry.detach(20);
        registry.detach_stack(20);

        let mut attach: Vec<Window> = registry.attach_order().to_vec();
        let mut stack: Vec<Window> = registry.stacking_order().to_vec();

        attach.sort_unstable();
        stack.sort_unstable();

        assert_eq!(attach, stack);
        assert_eq!(attach, vec![10, 30, 40]);
    }

    #[test]
    fn detaching_an_absent_handle_is_a_noop() {
        let mut registry = registry_with(&[10, 20]);

        assert!(registry.detach(99).is_none());
        registry.detach_stack(99);

        assert_eq!(registry.attach_order(), &[20, 10]);
        assert_eq!(registry.stacking_order(), &[20, 10]);
    }

    #[test]
    fn detaching_twice_is_idempotent() {
        let mut registry = registry_with(&[10]);

        assert!(registry.detach(10).is_some());
        assert!(registry.detach(10).is_none());
        registry.detach_stack(10);
        registry.detach_stack(10);

        assert!(registry.is_empty());
    }

    #[test]
    fn focus_successor_prefers_the_predecessor() {
        // attach A, B, C: attach order is [C, B, A]
        let registry = registry_with(&[1, 2, 3]);

        // B sits between C and A; its predecessor is C
        assert_eq!(registry.focus_successor_of(2, |_| true), Some(3));
    }

    #[test]
    fn focus_successor_of_the_head_falls_to_its_successor() {
        let registry = registry_with(&[1, 2, 3]);

        // C is head of list, no predecessor exists
        assert_eq!(registry.focus_successor_of(3, |_| true), Some(2));
    }

    #[test]
    fn focus_successor_of_the_last_client_is_none() {
        let registry = registry_with(&[1]);

        assert_eq!(registry.focus_successor_of(1, |_| true), None);
    }

    #[test]
    fn focus_successor_skips_filtered_out_clients() {
        let registry = registry_with(&[1, 2, 3, 4]);

        // [4, 3, 2, 1]; successor of 2 with 3 filtered out is 4
        assert_eq!(
            registry.focus_successor_of(2, |c| c.window() != 3),
            Some(4)
        );

        // nothing eligible before 2, so its successor 1 is next
        assert_eq!(
            registry.focus_successor_of(2, |c| c.window() < 2),
            Some(1)
        );
    }

    #[test]
    fn raising_reorders_only_the_stacking_order() {
        let mut registry = registry_with(&[10, 20, 30]);

        registry.raise_to_top(10);

        assert_eq!(registry.stacking_order(), &[10, 30, 20]);
        assert_eq!(registry.attach_order(), &[30, 20, 10]);
    }

    #[test]
    fn visible_iteration_follows_attach_order() {
        let mut registry = Registry::new();

        for &(window, workspace) in &[(10, 0), (20, 1), (30, 0)] {
            let client = client(window);
            client.set_workspace(workspace);
            registry.attach(client);
            registry.attach_stack(window);
        }

        let visible: Vec<Window> = registry.visible(0).map(|c| c.window()).collect();
        assert_eq!(visible, vec![30, 10]);

        // restartable without mutation
        let visible: Vec<Window> = registry.visible(0).map(|c| c.window()).collect();
        assert_eq!(visible, vec![30, 10]);
    }

    #[test]
    fn most_recent_respects_stacking_order() {
        let mut registry = registry_with(&[10, 20, 30]);

        registry.raise_to_top(20);

        assert_eq!(registry.most_recent(|_| true), Some(20));
        assert_eq!(registry.most_recent(|c| c.window() != 20), Some(30));
    }
}
