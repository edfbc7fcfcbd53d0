//! Depth-first element iterators over the document tree.

use super::{Attributes, Element, Node, TagName};

/// Pre-order iterator over every element below a list of nodes.
pub struct Elements<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Elements<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(Node::Element(el)) => {
                    self.stack.push(el.children.iter());
                    return Some(el);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Mutable view of one element: its name plus writable attributes.
///
/// Children are not reachable through the view; the iterator that produced
/// it walks them next.
pub struct ElementMut<'a> {
    pub name: &'a TagName,
    pub attributes: &'a mut Attributes,
}

/// Pre-order iterator yielding an [`ElementMut`] for every element.
pub struct ElementsMut<'a> {
    stack: Vec<std::slice::IterMut<'a, Node>>,
}

impl<'a> ElementsMut<'a> {
    pub fn new(nodes: &'a mut [Node]) -> Self {
        Self {
            stack: vec![nodes.iter_mut()],
        }
    }
}

impl<'a> Iterator for ElementsMut<'a> {
    type Item = ElementMut<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(Node::Element(Element {
                    name,
                    attributes,
                    children,
                    ..
                })) => {
                    self.stack.push(children.iter_mut());
                    return Some(ElementMut { name, attributes });
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
