//! Headless page: an in-memory document for driving a dropdown without a browser.
//!
//! Click dispatch follows the ordering a browser gives a trigger handler and
//! a document-wide listener: the trigger's handler runs first, then every
//! document listener attached at that point. Work scheduled for "the next
//! turn" sits in a task queue until [`HeadlessPage::settle`] runs it.

use std::collections::{BTreeMap, VecDeque};

use crate::{
    apply_commands, Commands, DropdownController, DropdownError, DropdownOptions,
    ListenerRegistry, ListenerRuntime, PanelHost, SubscriptionId, Visibility,
};

/// Handle to a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<NodeId>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
}

/// Minimal element tree: parent links, ids, classes and attributes.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Create a tree holding only the root (the document body).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an anonymous child to `parent`.
    pub fn append(&mut self, parent: NodeId) -> NodeId {
        self.nodes.push(Node {
            parent: Some(parent),
            ..Node::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Append a child carrying an `id` to `parent`.
    pub fn append_with_id(&mut self, parent: NodeId, id: &str) -> NodeId {
        let node = self.append(parent);
        self.nodes[node.0].id = Some(id.to_string());
        node
    }

    /// First node whose id equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(NodeId)
    }

    /// Check if `node` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    /// Check if `node` carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Attribute value of `node`.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    /// Add `class` to `node`.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DropdownError> {
        let n = self.node_mut(node, "classList.add")?;
        if !n.classes.iter().any(|c| c == class) {
            n.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Remove `class` from `node`.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DropdownError> {
        let n = self.node_mut(node, "classList.remove")?;
        n.classes.retain(|c| c != class);
        Ok(())
    }

    /// Set an attribute on `node`.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DropdownError> {
        let n = self.node_mut(node, "setAttribute")?;
        n.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// View `node` as a dropdown panel.
    pub fn panel(&mut self, node: NodeId) -> TreePanel<'_> {
        TreePanel { tree: self, node }
    }

    fn node_mut(&mut self, node: NodeId, operation: &str) -> Result<&mut Node, DropdownError> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| DropdownError::dom(operation, format!("no node {}", node.0)))
    }
}

/// A node of a [`NodeTree`] acting as the dropdown panel.
#[derive(Debug)]
pub struct TreePanel<'a> {
    tree: &'a mut NodeTree,
    node: NodeId,
}

impl PanelHost for TreePanel<'_> {
    type Target = NodeId;

    fn has_class(&self, class: &str) -> bool {
        self.tree.has_class(self.node, class)
    }

    fn add_class(&mut self, class: &str) -> Result<(), DropdownError> {
        self.tree.add_class(self.node, class)
    }

    fn remove_class(&mut self, class: &str) -> Result<(), DropdownError> {
        self.tree.remove_class(self.node, class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.tree.attribute(self.node, name).map(str::to_string)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), DropdownError> {
        self.tree.set_attribute(self.node, name, value)
    }

    fn contains(&self, target: &NodeId) -> bool {
        self.tree.contains(self.node, *target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Activate(SubscriptionId),
}

/// Task queue and attached document listeners.
#[derive(Debug, Default)]
struct EventLoop {
    tasks: VecDeque<Task>,
    listeners: ListenerRegistry<()>,
}

impl ListenerRuntime for EventLoop {
    fn schedule(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
        self.tasks.push_back(Task::Activate(id));
        Ok(())
    }

    fn attach(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
        self.listeners.insert(id, ());
        Ok(())
    }

    fn detach(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
        self.listeners.retire(id);
        Ok(())
    }
}

#[derive(Debug)]
struct Mounted {
    trigger: NodeId,
    panel: NodeId,
    controller: DropdownController,
}

/// A document with at most one mounted dropdown, a task queue and a set of
/// attached document click listeners.
#[derive(Debug)]
pub struct HeadlessPage {
    tree: NodeTree,
    event_loop: EventLoop,
    mounted: Option<Mounted>,
}

impl HeadlessPage {
    /// Wrap a tree. Nothing is mounted yet.
    pub fn new(tree: NodeTree) -> Self {
        Self {
            tree,
            event_loop: EventLoop::default(),
            mounted: None,
        }
    }

    /// The page's tree.
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Mount a dropdown with a default controller for `options`.
    pub fn mount(&mut self, options: &DropdownOptions) -> Result<(), DropdownError> {
        let controller = DropdownController::new(options.markers.clone());
        self.mount_with(options, controller)
    }

    /// Mount a dropdown driven by `controller`.
    ///
    /// Fails without binding anything if either element is missing. The
    /// panel is forced closed.
    pub fn mount_with(
        &mut self,
        options: &DropdownOptions,
        controller: DropdownController,
    ) -> Result<(), DropdownError> {
        let trigger = self
            .tree
            .get_element_by_id(&options.trigger_id)
            .ok_or_else(|| DropdownError::missing_element(&options.trigger_id))?;
        let panel = self
            .tree
            .get_element_by_id(&options.panel_id)
            .ok_or_else(|| DropdownError::missing_element(&options.panel_id))?;

        if self.mounted.is_some() {
            self.unmount()?;
        }
        self.mounted = Some(Mounted {
            trigger,
            panel,
            controller,
        });
        self.with_controller(|controller, panel| controller.reset(panel))?;
        log::info!(
            "Dropdown mounted on #{} -> #{}",
            options.trigger_id,
            options.panel_id
        );
        Ok(())
    }

    /// Detach everything and leave the panel closed.
    pub fn unmount(&mut self) -> Result<(), DropdownError> {
        self.with_controller(|controller, panel| controller.reset(panel))?;
        self.mounted = None;
        log::info!("Dropdown unmounted");
        Ok(())
    }

    /// Dispatch a primary click on `target`.
    pub fn click(&mut self, target: NodeId) -> Result<(), DropdownError> {
        let on_trigger = self
            .mounted
            .as_ref()
            .is_some_and(|m| self.tree.contains(m.trigger, target));
        if on_trigger {
            self.with_controller(|controller, panel| controller.toggle(panel))?;
        }

        for id in self.event_loop.listeners.ids() {
            // Detached earlier in this dispatch.
            if !self.event_loop.listeners.contains(id) {
                continue;
            }
            self.with_controller(|controller, panel| {
                controller.handle_document_click(panel, id, Some(&target))
            })?;
        }
        Ok(())
    }

    /// Programmatic open.
    pub fn open(&mut self) -> Result<(), DropdownError> {
        self.with_controller(|controller, panel| controller.open(panel))
    }

    /// Programmatic close.
    pub fn close(&mut self) -> Result<(), DropdownError> {
        self.with_controller(|controller, panel| controller.close(panel))
    }

    /// Run queued tasks until the queue is empty. Returns how many ran.
    pub fn settle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.event_loop.tasks.pop_front() {
            ran += 1;
            match task {
                Task::Activate(id) => {
                    let Some(mounted) = self.mounted.as_mut() else {
                        continue;
                    };
                    if let Some(command) = mounted.controller.activate(id) {
                        if let Err(e) = apply_commands(&mut self.event_loop, vec![command]) {
                            log::error!("Activation {} failed: {}", id.get(), e);
                        }
                    }
                }
            }
        }
        ran
    }

    /// Number of tasks waiting for the next turn.
    pub fn pending_tasks(&self) -> usize {
        self.event_loop.tasks.len()
    }

    /// Number of document click listeners currently attached.
    pub fn attached_listeners(&self) -> usize {
        self.event_loop.listeners.len()
    }

    /// Number of detached listeners still waiting to be dropped.
    pub fn retired_listeners(&self) -> usize {
        self.event_loop.listeners.retired_len()
    }

    /// Visibility of the mounted panel.
    pub fn visibility(&self) -> Option<Visibility> {
        let mounted = self.mounted.as_ref()?;
        let open_class = &mounted.controller.markers().open_class;
        Some(Visibility::from_open(
            self.tree.has_class(mounted.panel, open_class),
        ))
    }

    /// Value of the panel's expanded attribute.
    pub fn expanded(&self) -> Option<&str> {
        let mounted = self.mounted.as_ref()?;
        self.tree.attribute(
            mounted.panel,
            &mounted.controller.markers().expanded_attribute,
        )
    }

    /// Check that the panel's open class and expanded attribute agree.
    pub fn is_consistent(&self) -> bool {
        self.visibility()
            .zip(self.expanded().and_then(Visibility::from_expanded_value))
            .is_some_and(|(by_class, by_attribute)| by_class == by_attribute)
    }

    fn with_controller<F>(&mut self, f: F) -> Result<(), DropdownError>
    where
        F: FnOnce(&mut DropdownController, &mut TreePanel<'_>) -> Result<Commands, DropdownError>,
    {
        let mounted = self.mounted.as_mut().ok_or(DropdownError::NotMounted)?;
        let mut panel = self.tree.panel(mounted.panel);
        let commands = f(&mut mounted.controller, &mut panel)?;
        apply_commands(&mut self.event_loop, commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_contains() {
        let mut tree = NodeTree::new();
        let nav = tree.append(tree.root());
        let panel = tree.append_with_id(nav, "dropdown-menu");
        let link = tree.append(panel);
        let other = tree.append(tree.root());

        assert!(tree.contains(panel, panel));
        assert!(tree.contains(panel, link));
        assert!(tree.contains(tree.root(), link));
        assert!(!tree.contains(panel, nav));
        assert!(!tree.contains(panel, other));
    }

    #[test]
    fn test_tree_classes_and_attributes() {
        let mut tree = NodeTree::new();
        let node = tree.append_with_id(tree.root(), "x");
        assert_eq!(tree.get_element_by_id("x"), Some(node));
        assert_eq!(tree.get_element_by_id("y"), None);

        tree.add_class(node, "visible").unwrap();
        tree.add_class(node, "visible").unwrap();
        assert!(tree.has_class(node, "visible"));

        // A single remove clears it, so the second add did not duplicate.
        tree.remove_class(node, "visible").unwrap();
        assert!(!tree.has_class(node, "visible"));

        tree.set_attribute(node, "aria-expanded", "true").unwrap();
        assert_eq!(tree.attribute(node, "aria-expanded"), Some("true"));
    }

    #[test]
    fn test_unmounted_page() {
        let mut page = HeadlessPage::new(NodeTree::new());
        let root = page.tree().root();
        assert_eq!(page.visibility(), None);
        assert_eq!(page.open(), Err(DropdownError::NotMounted));
        // Clicks with nothing mounted are harmless.
        assert_eq!(page.click(root), Ok(()));
    }
}
