//! A binary min-heap over items living in an external arena. The heap only stores arena indices
//! and every item records its own position within the heap so that a changed priority can be
//! re-sifted in `O(log n)` without searching for it.
//!

use std::cmp::Ordering;

/// An item which can be ordered by a [MinHeap]
pub trait HeapItem {
	/// Position of the item within the heap storage
	fn get_heap_index(&self) -> usize;
	/// Record the position of the item within the heap storage
	fn set_heap_index(&mut self, index: usize);
	/// [Ordering::Less] when `self` should be removed before `other`
	fn compare(&self, other: &Self) -> Ordering;
}

/// Priority queue of arena indices
#[derive(Clone, Debug, Default)]
pub struct MinHeap {
	/// Arena indices laid out as a binary heap
	items: Vec<usize>,
}

impl MinHeap {
	/// Create an empty heap able to hold `capacity` items without reallocating
	pub fn with_capacity(capacity: usize) -> Self {
		MinHeap {
			items: Vec::with_capacity(capacity),
		}
	}
	/// Number of items in the heap
	pub fn len(&self) -> usize {
		self.items.len()
	}
	/// Whether the heap is empty
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
	/// Empty the heap, stale heap indices left on arena items are harmless as [MinHeap::contains]
	/// verifies identity
	pub fn clear(&mut self) {
		self.items.clear();
	}
	/// Whether the arena item `item` is currently in the heap
	pub fn contains<T: HeapItem>(&self, arena: &[T], item: usize) -> bool {
		let index = arena[item].get_heap_index();
		self.items.get(index) == Some(&item)
	}
	/// Insert the arena item `item`
	pub fn add<T: HeapItem>(&mut self, arena: &mut [T], item: usize) {
		let index = self.items.len();
		arena[item].set_heap_index(index);
		self.items.push(item);
		self.sort_up(arena, index);
	}
	/// Remove and return the arena index of the lowest item
	pub fn remove_first<T: HeapItem>(&mut self, arena: &mut [T]) -> Option<usize> {
		if self.items.is_empty() {
			return None;
		}
		let first = self.items.swap_remove(0);
		if let Some(&moved) = self.items.first() {
			arena[moved].set_heap_index(0);
			self.sort_down(arena, 0);
		}
		Some(first)
	}
	/// Restore ordering after the priority of `item` has decreased
	pub fn update_item<T: HeapItem>(&mut self, arena: &mut [T], item: usize) {
		if self.contains(arena, item) {
			let index = arena[item].get_heap_index();
			self.sort_up(arena, index);
		}
	}
	/// Move the item at heap position `index` towards the root while it beats its parent
	fn sort_up<T: HeapItem>(&mut self, arena: &mut [T], mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;
			if arena[self.items[index]].compare(&arena[self.items[parent]]) == Ordering::Less {
				self.swap(arena, index, parent);
				index = parent;
			} else {
				return;
			}
		}
	}
	/// Move the item at heap position `index` towards the leaves while a child beats it
	fn sort_down<T: HeapItem>(&mut self, arena: &mut [T], mut index: usize) {
		let count = self.items.len();
		loop {
			let left = index * 2 + 1;
			let right = index * 2 + 2;
			let mut swap_index = index;
			if left < count
				&& arena[self.items[left]].compare(&arena[self.items[swap_index]]) == Ordering::Less
			{
				swap_index = left;
			}
			if right < count
				&& arena[self.items[right]].compare(&arena[self.items[swap_index]]) == Ordering::Less
			{
				swap_index = right;
			}
			if swap_index == index {
				return;
			}
			self.swap(arena, index, swap_index);
			index = swap_index;
		}
	}
	/// Swap two heap positions and update the recorded heap indices
	fn swap<T: HeapItem>(&mut self, arena: &mut [T], a: usize, b: usize) {
		self.items.swap(a, b);
		arena[self.items[a]].set_heap_index(a);
		arena[self.items[b]].set_heap_index(b);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	/// Minimal arena entry
	struct Item {
		/// Lower is removed first
		priority: u32,
		/// Position in the heap
		heap_index: usize,
	}
	impl HeapItem for Item {
		fn get_heap_index(&self) -> usize {
			self.heap_index
		}
		fn set_heap_index(&mut self, index: usize) {
			self.heap_index = index;
		}
		fn compare(&self, other: &Self) -> Ordering {
			self.priority.cmp(&other.priority)
		}
	}
	/// Arena of items with the given priorities
	fn arena(priorities: &[u32]) -> Vec<Item> {
		priorities.iter().map(|p| Item { priority: *p, heap_index: 0 }).collect()
	}
	#[test]
	fn removes_in_priority_order() {
		let mut arena = arena(&[7, 3, 9, 1, 5, 3]);
		let mut heap = MinHeap::with_capacity(arena.len());
		for i in 0..arena.len() {
			heap.add(&mut arena, i);
		}
		let mut result = Vec::new();
		while let Some(i) = heap.remove_first(&mut arena) {
			result.push(arena[i].priority);
		}
		assert_eq!(vec![1, 3, 3, 5, 7, 9], result);
	}
	#[test]
	fn update_item_after_decrease() {
		let mut arena = arena(&[4, 6, 8]);
		let mut heap = MinHeap::default();
		for i in 0..3 {
			heap.add(&mut arena, i);
		}
		arena[2].priority = 1;
		heap.update_item(&mut arena, 2);
		assert_eq!(Some(2), heap.remove_first(&mut arena));
		assert_eq!(Some(0), heap.remove_first(&mut arena));
	}
	#[test]
	fn contains_checks_identity() {
		let mut arena = arena(&[2, 1]);
		let mut heap = MinHeap::default();
		heap.add(&mut arena, 0);
		assert!(heap.contains(&arena, 0));
		// item 1 has a heap index of 0 but was never added
		assert!(!heap.contains(&arena, 1));
		heap.clear();
		assert!(!heap.contains(&arena, 0));
		assert!(heap.is_empty());
	}
	#[test]
	fn heap_indices_stay_consistent() {
		let mut arena = arena(&[5, 4, 3, 2, 1, 0]);
		let mut heap = MinHeap::default();
		for i in 0..arena.len() {
			heap.add(&mut arena, i);
		}
		heap.remove_first(&mut arena);
		for i in 0..5 {
			assert!(heap.contains(&arena, i));
		}
		assert!(!heap.contains(&arena, 5));
		assert_eq!(5, heap.len());
	}
}
